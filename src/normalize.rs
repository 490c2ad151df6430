use crate::client::Fetcher;
use crate::entity::{Envelope, Episode, Podcast};
use crate::error::RankError;
use crate::model::{CatalogEntry, Category, CategoryResult, Entries, EpisodeEntry};
use serde::de::DeserializeOwned;

/// Projects the upstream JSON assets into the stable record shapes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Normalizer
    }

    /// Never fails: network trouble marks the category with `status=false`,
    /// an unreadable payload yields an empty category.
    pub fn fetch_category(
        &self,
        fetcher: &dyn Fetcher,
        category: Category,
        url: &str,
    ) -> CategoryResult {
        log::debug!("fetch {}: {}", category.key(), url);
        let body = match fetcher.get_text(url) {
            Ok(body) => body,
            Err(e) => {
                let e = RankError::CategoryFetch {
                    category,
                    reason: e.to_string(),
                };
                log::warn!("{}", e);
                return CategoryResult::failed(category);
            }
        };
        let data = project(category, &body);
        log::debug!("{}: {} records", category.key(), data.len());
        CategoryResult::ok(category, data)
    }
}

pub fn project(category: Category, body: &str) -> Entries {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("{} payload is not json: {}", category.key(), e);
            return Entries::empty(category);
        }
    };
    let payload = envelope.data.unwrap_or_default();
    if category.is_catalog() {
        let raw = payload.podcasts.unwrap_or_else(|| {
            log::warn!("{} payload has no data.podcasts", category.key());
            Vec::new()
        });
        let mut entries: Vec<CatalogEntry> = records::<Podcast>(category, raw)
            .into_iter()
            .map(CatalogEntry::from)
            .collect();
        assign_ranks(&mut entries);
        Entries::Podcasts(entries)
    } else {
        let raw = payload.episodes.unwrap_or_else(|| {
            log::warn!("{} payload has no data.episodes", category.key());
            Vec::new()
        });
        Entries::Episodes(
            records::<Episode>(category, raw)
                .into_iter()
                .map(EpisodeEntry::from)
                .collect(),
        )
    }
}

fn records<T: DeserializeOwned>(category: Category, raw: Vec<serde_json::Value>) -> Vec<T> {
    let total = raw.len();
    let parsed: Vec<T> = raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if parsed.len() < total {
        log::warn!(
            "{}: skipped {} malformed records",
            category.key(),
            total - parsed.len()
        );
    }
    parsed
}

// unranked records go after the ranked ones; duplicate ranks keep the first
fn assign_ranks(entries: &mut Vec<CatalogEntry>) {
    let mut next = entries.iter().map(|e| e.rank).max().unwrap_or(0);
    for e in entries.iter_mut().filter(|e| e.rank == 0) {
        next = next.saturating_add(1);
        e.rank = next;
    }
    entries.sort_by_key(|e| e.rank);
    let before = entries.len();
    entries.dedup_by_key(|e| e.rank);
    if entries.len() < before {
        log::warn!("dropped {} records with duplicate rank", before - entries.len());
    }
}
