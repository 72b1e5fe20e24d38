use std::collections::BTreeMap;

use serde::{Deserialize, de::Error as _};
use strum::Display;

use crate::cache::{Category, NameCache};

const RUNES_MARKER: &str = "runesReforged";
const SUMMONER_MARKER: &str = "summoner";
const CHAMPION_MARKER: &str = "champion/";
const ITEM_MARKER: &str = "item";

/// Skin name Data Dragon uses for a champion's base skin.
const BASE_SKIN: &str = "default";

/// What an archive member holds, decided by its path alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DocumentKind {
    Runes,
    Summoner,
    Champion,
    Item,
    /// Matched the archive filter but carries nothing we keep, e.g.
    /// `champion.json` or `championFull.json`.
    Unclassified,
}

impl DocumentKind {
    /// Classifies a member path. The first matching marker wins.
    pub fn of(path: &str) -> DocumentKind {
        if path.contains(RUNES_MARKER) {
            DocumentKind::Runes
        } else if path.contains(SUMMONER_MARKER) {
            DocumentKind::Summoner
        } else if path.contains(CHAMPION_MARKER) {
            DocumentKind::Champion
        } else if path.contains(ITEM_MARKER) {
            DocumentKind::Item
        } else {
            DocumentKind::Unclassified
        }
    }

    /// Parses a member body into the [`Document`] shape this kind expects.
    pub fn parse(self, body: &str) -> serde_json::Result<Document> {
        let document = match self {
            DocumentKind::Runes => Document::Runes(serde_json::from_str(body)?),
            DocumentKind::Summoner => {
                let summoner: DataMap<Named> = serde_json::from_str(body)?;
                Document::Summoner(summoner.data.into_values().collect())
            }
            DocumentKind::Champion => {
                let champion: DataMap<ChampionData> = serde_json::from_str(body)?;
                let champion = champion
                    .data
                    .into_values()
                    .next()
                    .ok_or_else(|| serde_json::Error::custom("champion document has no data"))?;
                Document::Champion(champion)
            }
            DocumentKind::Item => {
                let items: DataMap<Named> = serde_json::from_str(body)?;
                Document::Item(items.data.into_values().collect())
            }
            DocumentKind::Unclassified => {
                serde_json::from_str::<serde::de::IgnoredAny>(body)?;
                Document::Unclassified
            }
        };
        Ok(document)
    }
}

/// A parsed archive member, ready to be appended to a [`NameCache`].
#[derive(Debug, PartialEq, Eq)]
pub enum Document {
    Runes(Vec<RunePage>),
    Summoner(Vec<Named>),
    Champion(ChampionData),
    Item(Vec<Named>),
    Unclassified,
}

impl Document {
    /// Appends every display name this document carries to its pool.
    ///
    /// Runes in a page's first slot are keystones, the rest are not. The base
    /// skin is skipped. Item names are kept raw, markup included.
    pub fn append_to(self, names: &mut NameCache) {
        match self {
            Document::Runes(pages) => {
                for page in pages {
                    let mut slots = page.slots.into_iter();
                    if let Some(keystones) = slots.next() {
                        names.names_mut(Category::KeystoneRune).extend(keystones.names());
                    }
                    for slot in slots {
                        names.names_mut(Category::NonkeystoneRune).extend(slot.names());
                    }
                }
            }
            Document::Summoner(spells) => {
                names
                    .names_mut(Category::SummonerSpell)
                    .extend(spells.into_iter().map(|spell| spell.name));
            }
            Document::Champion(champion) => {
                names.names_mut(Category::Champion).push(champion.name);
                names
                    .names_mut(Category::Ability)
                    .extend(champion.spells.into_iter().map(|spell| spell.name));
                names.names_mut(Category::Skin).extend(
                    champion
                        .skins
                        .into_iter()
                        .map(|skin| skin.name)
                        .filter(|name| name != BASE_SKIN),
                );
            }
            Document::Item(items) => {
                names
                    .names_mut(Category::Item)
                    .extend(items.into_iter().map(|item| item.name));
            }
            Document::Unclassified => {}
        }
    }
}

/// The `{"type": ..., "data": {...}}` envelope most Data Dragon files use.
#[derive(Debug, Deserialize)]
struct DataMap<T> {
    data: BTreeMap<String, T>,
}

/// Any record we only need the display name of.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ChampionData {
    pub name: String,
    pub spells: Vec<Named>,
    pub skins: Vec<Named>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct RunePage {
    pub slots: Vec<RuneSlot>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct RuneSlot {
    pub runes: Vec<Named>,
}

impl RuneSlot {
    fn names(self) -> impl Iterator<Item = String> {
        self.runes.into_iter().map(|rune| rune.name)
    }
}
