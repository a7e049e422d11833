//! Wire format of the NASA CMR collection search (`collections.json`) and
//! its normalization into [`DatasetSummary`] records.

use super::DatasetSummary;
use serde::Deserialize;

pub const SERVICE: &str = "cmr";

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_SUMMARY: &str = "No summary available";

/// Marker identifying a DOI resolver link
const DOI_HOST_MARKER: &str = "doi.org";

/// Top-level search response
#[derive(Debug, Default, Deserialize)]
pub struct CmrResponse {
    #[serde(default)]
    pub feed: Option<CmrFeed>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CmrFeed {
    #[serde(default)]
    pub entry: Option<Vec<CmrEntry>>,
}

/// One collection in the feed. CMR returns many more fields; only the ones
/// we surface are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct CmrEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<CmrLink>>,
}

/// A related URL of a collection. Only `href` is read; `rel`, `type` and
/// the other link attributes are ignored on parse.
#[derive(Debug, Default, Deserialize)]
pub struct CmrLink {
    #[serde(default)]
    pub href: Option<String>,
}

impl CmrResponse {
    /// Entries of the feed; a response without `feed` or `feed.entry` has none
    #[must_use]
    pub fn into_entries(self) -> Vec<CmrEntry> {
        self.feed.and_then(|feed| feed.entry).unwrap_or_default()
    }

    /// Normalize every entry, preserving feed order
    #[must_use]
    pub fn into_summaries(self) -> Vec<DatasetSummary> {
        self.into_entries().into_iter().map(normalize_entry).collect()
    }
}

/// Convert one feed entry into a [`DatasetSummary`]
#[must_use]
pub fn normalize_entry(entry: CmrEntry) -> DatasetSummary {
    let link = entry.links.as_deref().and_then(select_link);

    DatasetSummary {
        title: entry.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        summary: entry
            .summary
            .map_or_else(|| DEFAULT_SUMMARY.to_string(), |s| s.trim().to_string()),
        link,
    }
}

/// Link selection policy: the first link whose `href` points at a DOI
/// resolver (`doi.org`). DOI links are the most stable way to cite a
/// collection. The link relation is not consulted.
#[must_use]
pub fn select_link(links: &[CmrLink]) -> Option<String> {
    links
        .iter()
        .filter_map(|link| link.href.as_deref())
        .find(|href| href.contains(DOI_HOST_MARKER))
        .map(str::to_string)
}
