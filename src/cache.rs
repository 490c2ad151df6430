// one snapshot per local day; refreshes are single flight

use crate::client::Fetcher;
use crate::discover::Discoverer;
use crate::model::{Category, CategoryResult, Snapshot};
use crate::normalize::Normalizer;
use crate::util::date_prefix;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub struct DayCache {
    fetcher: Box<dyn Fetcher>,
    discoverer: Discoverer,
    normalizer: Normalizer,
    clock: Box<dyn Clock>,
    held: RwLock<Option<Arc<Snapshot>>>,
    /// finished refresh attempts
    attempts: AtomicU64,
    /// outcome of the latest attempt, published or not
    refresh: Mutex<Option<Arc<Snapshot>>>,
}

impl DayCache {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        discoverer: Discoverer,
        clock: Box<dyn Clock>,
    ) -> Self {
        DayCache {
            fetcher,
            discoverer,
            normalizer: Normalizer::new(),
            clock,
            held: RwLock::new(None),
            attempts: AtomicU64::new(0),
            refresh: Mutex::new(None),
        }
    }

    /// held snapshot, whatever its date
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.held
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fresh(&self, today: &str) -> Option<Arc<Snapshot>> {
        self.current().filter(|s| s.date_prefix == today)
    }

    pub fn ensure_snapshot(&self) -> Arc<Snapshot> {
        let today = date_prefix(self.clock.today());
        if let Some(s) = self.fresh(&today) {
            return s;
        }
        let seen = self.attempts.load(Ordering::Acquire);
        let mut last = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(s) = self.fresh(&today) {
            log::debug!("joined in-flight refresh for {}", today);
            return s;
        }
        // an attempt finished while we waited, failed or not
        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(s) = last.as_ref() {
                log::debug!("joined failed refresh for {}", today);
                return s.clone();
            }
        }
        self.attempt(&mut last, today)
    }

    /// refresh even when the held snapshot is from today
    pub fn force_refresh(&self) -> Arc<Snapshot> {
        let mut last = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        let today = date_prefix(self.clock.today());
        self.attempt(&mut last, today)
    }

    fn attempt(&self, last: &mut Option<Arc<Snapshot>>, today: String) -> Arc<Snapshot> {
        let snapshot = self.acquire(today);
        *last = Some(snapshot.clone());
        self.attempts.fetch_add(1, Ordering::Release);
        snapshot
    }

    // caller holds the refresh lock
    fn acquire(&self, today: String) -> Arc<Snapshot> {
        log::info!("refreshing ranking snapshot for {}", today);
        let previous = self.current();
        let urls = match self.discoverer.discover_asset_urls(self.fetcher.as_ref()) {
            Ok(urls) => urls,
            Err(e) => {
                return match previous {
                    Some(stale) => {
                        log::warn!("{}, serving snapshot of {}", e, stale.date_prefix);
                        stale
                    }
                    None => {
                        log::warn!("{}, no snapshot to fall back on", e);
                        Arc::new(Snapshot::empty(today))
                    }
                };
            }
        };

        let fetched: Vec<CategoryResult> = thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .filter_map(|(category, url)| url.as_deref().map(|u| (*category, u)))
                .map(|(category, url)| {
                    let handle = scope.spawn(move || {
                        self.normalizer
                            .fetch_category(self.fetcher.as_ref(), category, url)
                    });
                    (category, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(category, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        log::error!("fetch worker for {} panicked", category.key());
                        CategoryResult::failed(category)
                    })
                })
                .collect()
        });

        let same_day = previous.filter(|p| p.date_prefix == today);
        let results = Category::ALL
            .iter()
            .filter_map(|category| {
                fetched
                    .iter()
                    .find(|r| r.category == *category)
                    .cloned()
                    .or_else(|| same_day.as_ref().and_then(|p| p.get(*category).cloned()))
            })
            .collect();

        let snapshot = Arc::new(Snapshot {
            date_prefix: today,
            results,
        });
        *self.held.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        log::info!(
            "snapshot {} published with {} categories",
            snapshot.date_prefix,
            snapshot.results.len()
        );
        snapshot
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::client::fake::FakeFetcher;
    use crate::discover::{fixtures::*, HOMEPAGE_URL};
    use crate::normalize::fixtures::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// settable day counter starting at 2024-03-09
    #[derive(Clone, Default)]
    pub struct FakeClock(pub Arc<AtomicI64>);

    impl FakeClock {
        pub fn advance(&self, days: i64) {
            self.0.fetch_add(days, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
                + chrono::Duration::days(self.0.load(Ordering::SeqCst))
        }
    }

    pub fn site(catalog: &[&str]) -> FakeFetcher {
        FakeFetcher::new()
            .route(HOMEPAGE_URL, &homepage_html())
            .route(BUNDLE_URL, &bundle_js())
            .route(FULL_URL, &catalog_json(catalog))
            .route(NEW_PODCASTS_URL, &catalog_json(&["Fresh Voices"]))
            .route(HOT_EPISODES_URL, &episodes_json(&["Ep 1", "Ep 2"]))
            .route(NEW_EPISODES_URL, &episodes_json(&["Pilot"]))
    }

    /// shares the fetcher with the test so it can be inspected and rewired
    pub struct Shared(pub Arc<FakeFetcher>);

    impl Fetcher for Shared {
        fn get_text(&self, url: &str) -> crate::error::RankResult<String> {
            self.0.get_text(url)
        }
    }

    pub fn cache(fetcher: &Arc<FakeFetcher>, clock: &FakeClock) -> DayCache {
        DayCache::new(
            Box::new(Shared(fetcher.clone())),
            Discoverer::new(HOMEPAGE_URL),
            Box::new(clock.clone()),
        )
    }
}
