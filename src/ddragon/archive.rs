use std::io::Read;

use anyhow::Context;
use flate2::read::GzDecoder;
use tar::Archive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const JSON_SUFFIX: &str = ".json";
const CATEGORY_MARKERS: [&str; 4] = ["champion", "summoner", "item", "runesReforged"];

/// Whether an archive member is one of the JSON documents we resolve.
pub fn is_wanted(path: &str, language: &str) -> bool {
    path.ends_with(JSON_SUFFIX)
        && path.contains(language)
        && CATEGORY_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Lists the member paths of an in-memory tarball that pass [`is_wanted`].
///
/// Gzipped tarballs (the `.tgz` Data Dragon ships) are detected by their magic
/// bytes, anything else is read as a plain tar.
pub fn matching_members(bytes: &[u8], language: &str) -> anyhow::Result<Vec<String>> {
    let paths = if bytes.starts_with(&GZIP_MAGIC) {
        member_paths(GzDecoder::new(bytes))?
    } else {
        member_paths(bytes)?
    };
    Ok(paths
        .into_iter()
        .filter(|path| is_wanted(path, language))
        .collect())
}

fn member_paths<R: Read>(reader: R) -> anyhow::Result<Vec<String>> {
    let mut archive = Archive::new(reader);
    let mut paths = Vec::new();
    for entry in archive
        .entries()
        .with_context(|| "couldn't read the archive")?
    {
        let entry = entry.with_context(|| "couldn't read an archive entry")?;
        let path = entry
            .path()
            .with_context(|| "couldn't read the path of an archive entry")?;
        paths.push(path.to_string_lossy().into_owned());
    }
    Ok(paths)
}
