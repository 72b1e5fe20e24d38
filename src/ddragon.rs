use anyhow::{Context, anyhow};
use std::sync::Arc;

use regex::Regex;
use reqwest::{
    Url,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use strum::IntoEnumIterator;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, warn};

use crate::cache::{Category, NameCache};
use crate::config::Config;

pub mod archive;
pub mod document;
#[cfg(test)]
pub(crate) mod fixture;

use document::{Document, DocumentKind};

const HTML_COMMENT: &str = r"(?s)<!--.*?-->";
const ANCHOR_HREF: &str = r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^"'\s>]+))"#;

/// Client for Riot's Data Dragon, the CDN League of Legends static data is
/// published on.
#[derive(Debug, Clone)]
pub struct DataDragon {
    http_client: reqwest::Client,
    config: Config,
}

impl DataDragon {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ddragon-sketch/", env!("CARGO_PKG_VERSION"))),
        );
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .with_context(|| "failed to build the HTTP client")?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Downloads the latest Data Dragon tarball and collects every display
    /// name it references into a fresh [`NameCache`].
    ///
    /// Failing to find or read the tarball aborts the refresh. A member that
    /// can't be fetched or parsed is logged and skipped, so the returned cache
    /// may be missing names.
    pub async fn refresh(&self) -> anyhow::Result<NameCache> {
        let archive_url = self
            .locate_archive()
            .await
            .with_context(|| "failed to locate the Data Dragon archive")?;
        info!(%archive_url, "found the Data Dragon archive");

        let members = self
            .fetch_archive(&archive_url)
            .await
            .with_context(|| format!("failed to read the archive at {archive_url}"))?;
        info!(members = members.len(), "resolving archive members");

        let mut names = NameCache::new();
        let resolved = self.resolve_members(members, &mut names).await;
        names.patch_legacy_items();

        for category in Category::iter() {
            debug!(%category, count = names.len(category), "refreshed category");
        }
        info!(resolved, "refreshed the name cache");
        Ok(names)
    }

    /// Scrapes the docs page for the first link to the Data Dragon tarball.
    pub async fn locate_archive(&self) -> anyhow::Result<Url> {
        let docs_url = Url::parse(&self.config.docs_url)
            .with_context(|| format!("{} is not a valid URL", self.config.docs_url))?;
        let page = self
            .http_client
            .get(docs_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let href = archive_link(&page, &self.config.archive_marker)?.ok_or_else(|| {
            anyhow!(
                "no link containing {:?} on {docs_url}",
                self.config.archive_marker
            )
        })?;
        let archive_url = docs_url
            .join(&href)
            .with_context(|| format!("{href} is not a valid link"))?;
        Ok(archive_url)
    }

    /// Downloads the whole tarball and lists the members worth resolving.
    pub async fn fetch_archive(&self, archive_url: &Url) -> anyhow::Result<Vec<String>> {
        let bytes = self
            .http_client
            .get(archive_url.clone())
            .send()
            .await
            .with_context(|| "couldn't download the archive")?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| "couldn't get the bytes of the archive")?;
        debug!(size = bytes.len(), "downloaded the archive");

        let language = self.config.language.clone();
        let members =
            tokio::task::spawn_blocking(move || archive::matching_members(&bytes, &language))
                .await??;
        Ok(members)
    }

    /// Fetches every member concurrently and appends what each one holds to
    /// `names` as results come in.
    ///
    /// Returns once every fetch has finished, with the number of members that
    /// made it into `names`.
    pub async fn resolve_members(&self, members: Vec<String>, names: &mut NameCache) -> usize {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_fetches.max(1)));
        let mut tasks = JoinSet::new();
        for member in members {
            let client = self.http_client.clone();
            let permits = permits.clone();
            let url = self.member_url(&member);
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => Self::fetch_member(client, url, DocumentKind::of(&member)).await,
                    Err(err) => Err(err.into()),
                };
                (member, result)
            });
        }

        let mut resolved = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((member, Ok(document))) => {
                    debug!(%member, "resolved archive member");
                    document.append_to(names);
                    resolved += 1;
                }
                Ok((member, Err(err))) => {
                    warn!(%member, "archive member generated an error: {err:#}");
                }
                Err(err) => warn!("archive member task failed: {err}"),
            }
        }
        resolved
    }

    fn member_url(&self, member: &str) -> String {
        format!(
            "{}/{}",
            self.config.cdn_url.trim_end_matches('/'),
            member.trim_start_matches("./")
        )
    }

    async fn fetch_member(
        http_client: reqwest::Client,
        url: String,
        kind: DocumentKind,
    ) -> anyhow::Result<Document> {
        let res = http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let document = kind
            .parse(&res)
            .with_context(|| format!("{url} is not a valid {kind} document"))?;
        Ok(document)
    }
}

/// The first hyperlink target on `page` containing `marker`.
///
/// Commented-out markup is skipped. `href` values may be double quoted,
/// single quoted or bare.
fn archive_link(page: &str, marker: &str) -> anyhow::Result<Option<String>> {
    let comments = Regex::new(HTML_COMMENT)?;
    let anchors = Regex::new(ANCHOR_HREF)?;
    let page = comments.replace_all(page, "");
    let href = anchors
        .captures_iter(&page)
        .filter_map(|captures| captures.get(1).or(captures.get(2)).or(captures.get(3)))
        .map(|href| href.as_str().replace("&amp;", "&"))
        .find(|href| href.contains(marker));
    Ok(href)
}
