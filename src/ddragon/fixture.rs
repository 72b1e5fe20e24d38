//! A local stand-in for the Riot docs page and the Data Dragon CDN.

use std::{
    collections::HashMap,
    io::Write,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use flate2::{Compression, write::GzEncoder};

use crate::config::Config;

pub const DOCS_PAGE: &str = r#"<html><body>
    <a href="https://developer.riotgames.com/apis">APIs</a>
    <a class="download" href="/ddragon/dragontail-14.1.1.tgz?a=1&amp;b=2">Data Dragon</a>
    <a href="/ddragon/dragontail-13.24.1.tgz">Older</a>
</body></html>"#;

pub const DOCS_WITHOUT_ARCHIVE: &str = r#"<html><body>
    <a href="https://developer.riotgames.com/apis">APIs</a>
</body></html>"#;

pub const FIRE_AT_WILL: &str = "<rarityLegendary>Fire at Will</rarityLegendary><br><subtitleLeft><silver>500 Silver Serpents</silver></subtitleLeft>";

const ANNIE: &str = r#"{"type": "champion", "version": "14.1.1", "data": {"Annie": {
    "id": "Annie", "key": "1", "name": "Annie", "title": "the Dark Child",
    "skins": [{"id": "1000", "num": 0, "name": "default"}, {"id": "1001", "num": 1, "name": "Goth Annie"}],
    "spells": [{"id": "AnnieQ", "name": "Disintegrate"}, {"id": "AnnieR", "name": "Summon: Tibbers"}]
}}}"#;

const AHRI: &str = r#"{"type": "champion", "version": "14.1.1", "data": {"Ahri": {
    "id": "Ahri", "key": "103", "name": "Ahri", "title": "the Nine-Tailed Fox",
    "skins": [{"id": "103000", "num": 0, "name": "default"}, {"id": "103001", "num": 1, "name": "Dynasty Ahri"}],
    "spells": [{"id": "AhriQ", "name": "Orb of Deception"}]
}}}"#;

const CHAMPION_SUMMARY: &str = r#"{"type": "champion", "data": {"Zed": {"name": "Zed"}}}"#;

const ITEMS: &str = r#"{"type": "item", "data": {
    "1001": {"name": "Boots"},
    "3901": {"name": "<rarityLegendary>Fire at Will</rarityLegendary><br><subtitleLeft><silver>500 Silver Serpents</silver></subtitleLeft>"},
    "7002": {"name": "<ornnBonus>Draktharr's Shadowcarver</ornnBonus>"}
}}"#;

const KOREAN_ITEMS: &str = r#"{"type": "item", "data": {"1001": {"name": "장화"}}}"#;

const SUMMONERS: &str = r#"{"type": "summoner", "data": {
    "SummonerFlash": {"id": "SummonerFlash", "name": "Flash"},
    "SummonerDot": {"id": "SummonerDot", "name": "Ignite"}
}}"#;

const RUNES: &str = r#"[{"id": 8100, "key": "Domination", "slots": [
    {"runes": [{"id": 8112, "name": "Electrocute"}, {"id": 8124, "name": "Predator"}]},
    {"runes": [{"id": 8126, "name": "Cheap Shot"}]},
    {"runes": [{"id": 8136, "name": "Zombie Ward"}]},
    {"runes": [{"id": 8135, "name": "Treasure Hunter"}]}
]}]"#;

/// Archive members and what the CDN answers for them. `None` answers 500.
const MEMBERS: [(&str, Option<&str>); 11] = [
    ("14.1.1/data/en_US/champion/Annie.json", Some(ANNIE)),
    ("14.1.1/data/en_US/champion/Ahri.json", Some(AHRI)),
    ("14.1.1/data/en_US/champion/Broken.json", None),
    ("14.1.1/data/en_US/champion/Empty.json", Some(r#"{"data": {}}"#)),
    ("14.1.1/data/en_US/champion.json", Some(CHAMPION_SUMMARY)),
    ("14.1.1/data/en_US/item.json", Some(ITEMS)),
    ("14.1.1/data/en_US/summoner.json", Some(SUMMONERS)),
    ("14.1.1/data/en_US/runesReforged.json", Some(RUNES)),
    ("14.1.1/data/ko_KR/item.json", Some(KOREAN_ITEMS)),
    ("14.1.1/data/en_US/map.json", Some("{}")),
    ("14.1.1/img/champion/Annie.png", Some("")),
];

static SNAPSHOTS: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone)]
struct Cdn {
    docs: &'static str,
    archive: Arc<Vec<u8>>,
    documents: Arc<HashMap<String, Option<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

pub struct DragonServer {
    pub base: String,
    requested: Arc<Mutex<Vec<String>>>,
}

impl DragonServer {
    pub async fn start() -> anyhow::Result<Self> {
        Self::with_docs(DOCS_PAGE).await
    }

    pub async fn with_docs(docs: &'static str) -> anyhow::Result<Self> {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let cdn = Cdn {
            docs,
            archive: Arc::new(tarball()?),
            documents: Arc::new(
                MEMBERS
                    .iter()
                    .map(|(path, body)| (path.to_string(), body.map(str::to_string)))
                    .collect(),
            ),
            requested: requested.clone(),
        };
        let app = Router::new()
            .route("/docs", get(docs_page))
            .route("/ddragon/dragontail-14.1.1.tgz", get(archive))
            .route("/cdn/{*path}", get(document))
            .with_state(cdn);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(Self {
            base: format!("http://{addr}"),
            requested,
        })
    }

    /// A config pointing at this server, with a snapshot path of its own.
    pub fn config(&self) -> Config {
        let snapshot = format!(
            "ddragon-sketch-{}-{}.json",
            std::process::id(),
            SNAPSHOTS.fetch_add(1, Ordering::Relaxed)
        );
        Config {
            docs_url: format!("{}/docs", self.base),
            cdn_url: format!("{}/cdn/", self.base),
            snapshot_path: std::env::temp_dir().join(snapshot),
            ..Default::default()
        }
    }

    /// Member paths the CDN was asked for so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

async fn docs_page(State(cdn): State<Cdn>) -> Html<&'static str> {
    Html(cdn.docs)
}

async fn archive(State(cdn): State<Cdn>) -> Vec<u8> {
    cdn.archive.as_ref().clone()
}

async fn document(State(cdn): State<Cdn>, Path(path): Path<String>) -> Response {
    if let Ok(mut requested) = cdn.requested.lock() {
        requested.push(path.clone());
    }
    match cdn.documents.get(&path) {
        Some(Some(body)) => body.clone().into_response(),
        Some(None) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn tarball() -> anyhow::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    builder.append_data(&mut dir, "14.1.1/data/en_US/", &b""[..])?;
    for (path, _) in MEMBERS {
        let mut header = tar::Header::new_gnu();
        header.set_size(2);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, &b"{}"[..])?;
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&builder.into_inner()?)?;
    Ok(encoder.finish()?)
}
