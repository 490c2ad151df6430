use crate::fuzzy::Index;
use crate::model::{CatalogEntry, Snapshot};
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_THRESHOLD: f64 = 0.2;
pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_RSS_TEMPLATE: &str = "https://rsshub.app/xiaoyuzhou/podcast/{id}";
pub const DEFAULT_SITE_LINK: &str = "xyz";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub rank: u32,
    pub name: String,
    /// empty when no feed address can be derived
    pub rss: String,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    pub threshold: f64,
    pub limit: usize,
    /// fallback feed address, `{id}` is replaced with the podcast id
    pub rss_template: String,
    /// name of the link that points at the podcast page on the ranking site
    pub site_link: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
            rss_template: DEFAULT_RSS_TEMPLATE.to_string(),
            site_link: DEFAULT_SITE_LINK.to_string(),
        }
    }
}

pub fn split_terms(query: &str) -> Vec<&str> {
    query
        .split(|c: char| c.is_whitespace() || c == ',' || c == '，')
        .filter(|t| !t.is_empty())
        .collect()
}

impl Resolver {
    /// Matches of `query` in the snapshot's full catalog, by ascending rank.
    pub fn resolve(&self, snapshot: &Snapshot, query: &str) -> Vec<Resolved> {
        let terms = split_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let catalog = snapshot.catalog();
        let index = Index::new(
            catalog.iter().map(|e| e.name.as_str()),
            self.threshold,
            self.limit,
        );
        let hits = index.search(&terms);
        log::debug!("{:?}: {} candidates", terms, hits.len());

        let by_name = first_by_name(catalog);
        let mut resolved: Vec<Resolved> = hits
            .iter()
            .filter_map(|h| by_name.get(catalog[h.index].name.as_str()))
            .map(|entry| Resolved {
                rank: entry.rank,
                name: entry.name.clone(),
                rss: self.rss_for(entry),
            })
            .collect();
        // duplicate names collapse onto their first entry
        resolved.sort_by_key(|r| r.rank);
        resolved.dedup_by_key(|r| r.rank);
        resolved
    }

    pub fn rss_for(&self, entry: &CatalogEntry) -> String {
        if let Some(rss) = entry.links.iter().find(|l| l.name.eq_ignore_ascii_case("rss")) {
            return rss.url.clone();
        }
        entry
            .links
            .iter()
            .filter(|l| l.name.eq_ignore_ascii_case(&self.site_link))
            .find_map(|l| podcast_id(&l.url))
            .map(|id| self.rss_template.replace("{id}", &id))
            .unwrap_or_default()
    }
}

fn first_by_name(catalog: &[CatalogEntry]) -> HashMap<&str, &CatalogEntry> {
    let mut map = HashMap::with_capacity(catalog.len());
    for entry in catalog {
        map.entry(entry.name.as_str()).or_insert(entry);
    }
    map
}

/// path segment following `podcast`
pub fn podcast_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "podcast")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
