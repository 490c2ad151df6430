use crate::cache::DayCache;
use crate::error::{RankError, RankResult};
use crate::model::{CatalogEntry, Snapshot};
use crate::resolve::{Resolved, Resolver};
use crate::rss::{Feed, Parser};
use std::sync::Arc;

/// The operations exposed to the tool layer.
pub struct RankService {
    cache: DayCache,
    resolver: Resolver,
    parser: Box<dyn Parser>,
}

impl RankService {
    pub fn new(cache: DayCache, resolver: Resolver, parser: Box<dyn Parser>) -> Self {
        RankService {
            cache,
            resolver,
            parser,
        }
    }

    pub fn ensure_snapshot(&self) -> Arc<Snapshot> {
        self.cache.ensure_snapshot()
    }

    pub fn refresh(&self) -> Arc<Snapshot> {
        self.cache.force_refresh()
    }

    pub fn resolve(&self, query: &str) -> Vec<Resolved> {
        let snapshot = self.cache.ensure_snapshot();
        self.resolver.resolve(&snapshot, query)
    }

    pub fn parse_rss(&self, url: &str) -> RankResult<Feed> {
        self.parser.parse_rss(url)
    }

    /// Best-ranked match that has a feed address, parsed.
    pub fn feed_by_name(&self, name: &str) -> RankResult<(Resolved, Feed)> {
        let matches = self.resolve(name);
        let best = matches
            .into_iter()
            .find(|m| !m.rss.is_empty())
            .ok_or_else(|| {
                RankError::FeedParse(format!("no podcast with a feed matches \"{}\"", name))
            })?;
        let feed = self.parser.parse_rss(&best.rss)?;
        Ok((best, feed))
    }

    /// Catalog entry whose name is exactly the feed's title.
    pub fn ranking_of(&self, feed: &Feed) -> Option<CatalogEntry> {
        let title = feed.basic_info.title.trim();
        if title.is_empty() {
            return None;
        }
        self.cache
            .ensure_snapshot()
            .catalog()
            .iter()
            .find(|e| e.name == title)
            .cloned()
    }
}
