use std::{
    collections::HashSet,
    fs::{self, File, create_dir_all},
    io::{self, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Gangplank's upgrade "items" ship with markup in their display name. The raw
/// string is swapped for the plain name after every refresh.
const LEGACY_ITEMS: [(&str, &str); 3] = [
    (
        "<rarityLegendary>Fire at Will</rarityLegendary><br><subtitleLeft><silver>500 Silver Serpents</silver></subtitleLeft>",
        "Fire at Will",
    ),
    (
        "<rarityLegendary>Death's Daughter</rarityLegendary><br><subtitleLeft><silver>500 Silver Serpents</silver></subtitleLeft>",
        "Death's Daughter",
    ),
    (
        "<rarityLegendary>Raise Morale</rarityLegendary><br><subtitleLeft><silver>500 Silver Serpents</silver></subtitleLeft>",
        "Raise Morale",
    ),
];

/// One of the seven answer pools kept by the [`NameCache`].
///
/// The [`Display`] form matches the key used in a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Champion,
    Item,
    Skin,
    Ability,
    KeystoneRune,
    NonkeystoneRune,
    SummonerSpell,
}

#[derive(Debug, displaydoc::Display, thiserror::Error)]
pub enum SnapshotError {
    /// could not access the snapshot file: {0}
    Io(#[from] io::Error),
    /// the snapshot file is not a valid name cache: {0}
    Json(#[from] serde_json::Error),
}

/// Display names scraped from Data Dragon, grouped by [`Category`].
///
/// Every pool always exists. Duplicates are kept as they were found, the
/// answer sets handed out by [`NameCache::select`] collapse them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCache {
    pub champion: Vec<String>,
    pub item: Vec<String>,
    pub skin: Vec<String>,
    pub ability: Vec<String>,
    pub keystone_rune: Vec<String>,
    pub nonkeystone_rune: Vec<String>,
    pub summoner_spell: Vec<String>,
}

/// A snapshot on disk. Pools missing from the file leave the in-memory pool
/// untouched on load.
#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    champion: Option<Vec<String>>,
    item: Option<Vec<String>>,
    skin: Option<Vec<String>>,
    ability: Option<Vec<String>>,
    keystone_rune: Option<Vec<String>>,
    nonkeystone_rune: Option<Vec<String>>,
    summoner_spell: Option<Vec<String>>,
}

impl Snapshot {
    fn into_pools(self) -> [(Category, Option<Vec<String>>); 7] {
        [
            (Category::Champion, self.champion),
            (Category::Item, self.item),
            (Category::Skin, self.skin),
            (Category::Ability, self.ability),
            (Category::KeystoneRune, self.keystone_rune),
            (Category::NonkeystoneRune, self.nonkeystone_rune),
            (Category::SummonerSpell, self.summoner_spell),
        ]
    }
}

impl NameCache {
    pub fn new() -> NameCache {
        NameCache::default()
    }

    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::Champion => &self.champion,
            Category::Item => &self.item,
            Category::Skin => &self.skin,
            Category::Ability => &self.ability,
            Category::KeystoneRune => &self.keystone_rune,
            Category::NonkeystoneRune => &self.nonkeystone_rune,
            Category::SummonerSpell => &self.summoner_spell,
        }
    }

    pub fn names_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Champion => &mut self.champion,
            Category::Item => &mut self.item,
            Category::Skin => &mut self.skin,
            Category::Ability => &mut self.ability,
            Category::KeystoneRune => &mut self.keystone_rune,
            Category::NonkeystoneRune => &mut self.nonkeystone_rune,
            Category::SummonerSpell => &mut self.summoner_spell,
        }
    }

    pub fn len(&self, category: Category) -> usize {
        self.names(category).len()
    }

    pub fn is_empty(&self) -> bool {
        Category::iter().all(|category| self.names(category).is_empty())
    }

    /// Writes every pool to `path` as a JSON object keyed by [`Category`].
    ///
    /// Missing parent directories are created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_dir_all(dir)?;
        }
        let ser = serde_json::to_string_pretty(self)?;
        fs::write(path, ser)?;
        Ok(())
    }

    /// Reads a snapshot from `path` and overwrites each pool the file names.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let file = File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        for (category, names) in snapshot.into_pools() {
            if let Some(names) = names {
                *self.names_mut(category) = names;
            }
        }
        Ok(())
    }

    /// Every distinct name in the pools gated by `selection`.
    pub fn select(&self, selection: &Selection) -> HashSet<String> {
        selection
            .groups()
            .into_iter()
            .flat_map(|category| self.names(category).iter().cloned())
            .collect()
    }

    pub fn select_all(&self) -> HashSet<String> {
        self.select(&Selection::all())
    }

    /// Replaces the three known markup-laden legacy item names with their
    /// plain names. Only exact matches are touched.
    pub fn patch_legacy_items(&mut self) {
        for (raw, plain) in LEGACY_ITEMS {
            if self.item.iter().any(|name| name == raw) {
                self.item.retain(|name| name != raw);
                self.item.push(plain.to_string());
            }
        }
    }
}

/// The option groups offered by lolsketch.
///
/// Keystone runes and summoner spells share one answer pool in the game, so a
/// single flag gates both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub champion: bool,
    pub item: bool,
    pub skin: bool,
    pub ability: bool,
    pub keystone_rune_and_summoner_spell: bool,
    pub nonkeystone_rune: bool,
}

impl Selection {
    pub fn all() -> Selection {
        Selection {
            champion: true,
            item: true,
            skin: true,
            ability: true,
            keystone_rune_and_summoner_spell: true,
            nonkeystone_rune: true,
        }
    }

    pub fn groups(&self) -> Vec<Category> {
        let mut groups = Vec::with_capacity(7);
        if self.champion {
            groups.push(Category::Champion);
        }
        if self.item {
            groups.push(Category::Item);
        }
        if self.skin {
            groups.push(Category::Skin);
        }
        if self.ability {
            groups.push(Category::Ability);
        }
        if self.keystone_rune_and_summoner_spell {
            groups.push(Category::KeystoneRune);
            groups.push(Category::SummonerSpell);
        }
        if self.nonkeystone_rune {
            groups.push(Category::NonkeystoneRune);
        }
        groups
    }
}
