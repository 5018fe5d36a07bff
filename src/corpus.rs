//! Corpus loading: a directory of `.html` pages and the anchors between them.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::{Error, Result};

lazy_static! {
    static ref ANCHOR_HREF: Regex =
        Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("anchor pattern is valid");
}

/// Page name (file name) to the set of in-corpus pages it links to.
pub type Corpus = BTreeMap<String, BTreeSet<String>>;

/// `href` targets of every `<a ... href="...">` in `html`, verbatim.
pub fn extract_links(html: &str) -> BTreeSet<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Read every `*.html` file directly inside `dir` (not recursive).
///
/// Self-links are dropped, and so are links to anything that is not another page of the same
/// corpus. Fails with [`Error::EmptyCorpus`] if there are no pages.
pub fn crawl(dir: impl AsRef<Path>) -> Result<Corpus> {
    let dir = dir.as_ref();
    let mut pages = Corpus::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".html") {
            continue;
        }

        let contents = fs::read_to_string(entry.path()).map_err(|source| Error::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let mut links = extract_links(&contents);
        links.remove(&name);
        tracing::trace!(page = %name, raw_links = links.len(), "crawled page");
        pages.insert(name, links);
    }

    if pages.is_empty() {
        return Err(Error::EmptyCorpus(dir.to_path_buf()));
    }

    let names: BTreeSet<String> = pages.keys().cloned().collect();
    for links in pages.values_mut() {
        links.retain(|link| names.contains(link));
    }

    tracing::debug!(dir = %dir.display(), pages = pages.len(), "loaded corpus");
    Ok(pages)
}
