// homepage -> hashed bundle -> hashed json assets, both hops by regex

use crate::client::Fetcher;
use crate::error::{RankError, RankResult};
use crate::model::Category;
use regex::Regex;
use std::collections::BTreeMap;
use url::Url;

pub const HOMEPAGE_URL: &str = "https://xyzrank.com/";

const BUNDLE_PATTERN: &str = r#"<script type="module" crossorigin src="((?:https?:)?[^"]*/assets/index[.-][a-zA-Z0-9_-]+\.js)"></script>"#;
const FULL_PATTERN: &str = r"https://xyzrank\.com/assets/full\.[a-zA-Z0-9]+\.json";
const NEW_PODCASTS_PATTERN: &str = r"https://xyzrank\.com/assets/new-podcasts\.[a-zA-Z0-9]+\.json";
const HOT_EPISODES_PATTERN: &str = r"https://xyzrank\.com/assets/hot-episodes\.[a-zA-Z0-9]+\.json";
const NEW_EPISODES_PATTERN: &str =
    r"https://xyzrank\.com/assets/hot-episodes-new\.[a-zA-Z0-9]+\.json";

pub type AssetUrls = BTreeMap<Category, Option<String>>;

#[derive(Debug, Clone)]
pub struct Patterns {
    /// first capture group is the bundle address
    pub bundle: Regex,
    pub assets: Vec<(Category, Regex)>,
}

impl Patterns {
    pub fn new(bundle: &str, assets: &[(Category, &str)]) -> Result<Self, regex::Error> {
        Ok(Patterns {
            bundle: Regex::new(bundle)?,
            assets: assets
                .iter()
                .map(|(c, p)| Regex::new(p).map(|re| (*c, re)))
                .collect::<Result<_, regex::Error>>()?,
        })
    }

    pub fn bundle_url(&self, html: &str) -> Option<String> {
        self.bundle
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn asset_urls(&self, script: &str) -> AssetUrls {
        self.assets
            .iter()
            .map(|(category, re)| {
                let found = re.find(script).map(|m| m.as_str().to_string());
                log::debug!("{} => {:?}", category.key(), found);
                (*category, found)
            })
            .collect()
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Patterns::new(
            BUNDLE_PATTERN,
            &[
                (Category::FullCatalog, FULL_PATTERN),
                (Category::NewPodcasts, NEW_PODCASTS_PATTERN),
                (Category::HotEpisodes, HOT_EPISODES_PATTERN),
                (Category::NewEpisodes, NEW_EPISODES_PATTERN),
            ],
        )
        .expect("built-in patterns compile")
    }
}

pub struct Discoverer {
    homepage: String,
    patterns: Patterns,
}

impl Discoverer {
    pub fn new(homepage: &str) -> Self {
        Self::with_patterns(homepage, Patterns::default())
    }

    pub fn with_patterns(homepage: &str, patterns: Patterns) -> Self {
        Discoverer {
            homepage: homepage.to_string(),
            patterns,
        }
    }

    pub fn discover_asset_urls(&self, fetcher: &dyn Fetcher) -> RankResult<AssetUrls> {
        let html = fetcher
            .get_text(&self.homepage)
            .map_err(|e| RankError::Discovery(format!("homepage: {}", e)))?;
        let bundle = self
            .patterns
            .bundle_url(&html)
            .ok_or_else(|| RankError::Discovery("bundle not found".to_string()))?;
        let bundle = absolutize(&self.homepage, &bundle)?;
        log::debug!("bundle {}", bundle);

        let script = fetcher
            .get_text(&bundle)
            .map_err(|e| RankError::Discovery(format!("bundle: {}", e)))?;
        let urls = self.patterns.asset_urls(&script);
        for (category, url) in &urls {
            if url.is_none() {
                log::warn!("no asset url for {}", category.key());
            }
        }
        Ok(urls)
    }
}

// bundle references may be relative to the homepage
fn absolutize(homepage: &str, src: &str) -> RankResult<String> {
    Url::parse(homepage)
        .and_then(|base| base.join(src))
        .map(String::from)
        .map_err(|e| RankError::Discovery(format!("bundle url {}: {}", src, e)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const BUNDLE_URL: &str = "https://xyzrank.justinbot.com/assets/index.a1B2c3.js";
    pub const FULL_URL: &str = "https://xyzrank.com/assets/full.9f8e7d.json";
    pub const NEW_PODCASTS_URL: &str = "https://xyzrank.com/assets/new-podcasts.11aa22.json";
    pub const HOT_EPISODES_URL: &str = "https://xyzrank.com/assets/hot-episodes.33bb44.json";
    pub const NEW_EPISODES_URL: &str = "https://xyzrank.com/assets/hot-episodes-new.55cc66.json";

    pub fn homepage_html() -> String {
        format!(
            r#"<!DOCTYPE html><html><head><meta charset="UTF-8" />
<script type="module" crossorigin src="{}"></script>
<link rel="stylesheet" href="https://xyzrank.justinbot.com/assets/index.x1.css"></head><body><div id="app"></div></body></html>"#,
            BUNDLE_URL
        )
    }

    pub fn bundle_js() -> String {
        format!(
            r#"const a="{}",b="{}",c="{}",d="{}";export{{a,b,c,d}};"#,
            FULL_URL, HOT_EPISODES_URL, NEW_EPISODES_URL, NEW_PODCASTS_URL
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::client::fake::FakeFetcher;

    #[test]
    fn two_hop_discovery() {
        let fetcher = FakeFetcher::new()
            .route(HOMEPAGE_URL, &homepage_html())
            .route(BUNDLE_URL, &bundle_js());
        let urls = Discoverer::new(HOMEPAGE_URL)
            .discover_asset_urls(&fetcher)
            .unwrap();
        assert_eq!(urls[&Category::FullCatalog].as_deref(), Some(FULL_URL));
        assert_eq!(urls[&Category::NewPodcasts].as_deref(), Some(NEW_PODCASTS_URL));
        assert_eq!(urls[&Category::HotEpisodes].as_deref(), Some(HOT_EPISODES_URL));
        assert_eq!(urls[&Category::NewEpisodes].as_deref(), Some(NEW_EPISODES_URL));
    }

    #[test]
    fn missing_asset_is_none() {
        let js = bundle_js().replace(NEW_PODCASTS_URL, "");
        let fetcher = FakeFetcher::new()
            .route(HOMEPAGE_URL, &homepage_html())
            .route(BUNDLE_URL, &js);
        let urls = Discoverer::new(HOMEPAGE_URL)
            .discover_asset_urls(&fetcher)
            .unwrap();
        assert_eq!(urls[&Category::NewPodcasts], None);
        assert!(urls[&Category::FullCatalog].is_some());
        assert_eq!(urls.len(), 4);
    }

    #[test]
    fn bundle_not_found() {
        let fetcher = FakeFetcher::new().route(HOMEPAGE_URL, "<html>maintenance</html>");
        let err = Discoverer::new(HOMEPAGE_URL)
            .discover_asset_urls(&fetcher)
            .unwrap_err();
        assert_eq!(err, RankError::Discovery("bundle not found".to_string()));
    }

    #[test]
    fn homepage_unreachable() {
        let fetcher = FakeFetcher::new().fail(HOMEPAGE_URL, 502);
        match Discoverer::new(HOMEPAGE_URL).discover_asset_urls(&fetcher) {
            Err(RankError::Discovery(msg)) => assert!(msg.starts_with("homepage")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bundle_unreachable() {
        let fetcher = FakeFetcher::new().route(HOMEPAGE_URL, &homepage_html());
        match Discoverer::new(HOMEPAGE_URL).discover_asset_urls(&fetcher) {
            Err(RankError::Discovery(msg)) => assert!(msg.starts_with("bundle:")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn hot_episodes_does_not_match_new() {
        let js = format!(r#"x="{}""#, NEW_EPISODES_URL);
        let urls = Patterns::default().asset_urls(&js);
        assert_eq!(urls[&Category::HotEpisodes], None);
        assert_eq!(urls[&Category::NewEpisodes].as_deref(), Some(NEW_EPISODES_URL));
    }

    #[test]
    fn swapped_patterns() {
        let p = Patterns::new(
            r#"<script src="(/static/main\.js)">"#,
            &[(Category::FullCatalog, r"/data/full-\d+\.json")],
        )
        .unwrap();
        let fetcher = FakeFetcher::new()
            .route("https://mirror.test/", r#"<script src="/static/main.js">"#)
            .route("https://mirror.test/static/main.js", "load('/data/full-42.json')");
        let urls = Discoverer::with_patterns("https://mirror.test/", p)
            .discover_asset_urls(&fetcher)
            .unwrap();
        assert_eq!(urls[&Category::FullCatalog].as_deref(), Some("/data/full-42.json"));
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn relative_bundle_paths() {
        let join = |home, src| absolutize(home, src).unwrap();
        assert_eq!(
            join("https://xyzrank.com/", "/assets/index.abc.js"),
            "https://xyzrank.com/assets/index.abc.js"
        );
        assert_eq!(
            join("https://xyzrank.com/", "//cdn.test/assets/index.abc.js"),
            "https://cdn.test/assets/index.abc.js"
        );
        assert_eq!(join("https://xyzrank.com/", BUNDLE_URL), BUNDLE_URL);
        assert_eq!(
            join("https://mirror.test/xyz/", "assets/index.abc.js"),
            "https://mirror.test/xyz/assets/index.abc.js"
        );
        assert_eq!(
            join("https://mirror.test/xyz/", "/assets/index.abc.js"),
            "https://mirror.test/assets/index.abc.js"
        );
    }

    #[test]
    fn unparseable_homepage_is_discovery_error() {
        match absolutize("not a url", "assets/index.abc.js") {
            Err(RankError::Discovery(msg)) => assert!(msg.starts_with("bundle url")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn document_relative_bundle_under_path() {
        let home = "https://mirror.test/xyz/";
        let html = r#"<script type="module" crossorigin src="./assets/index.a1B2c3.js"></script>"#;
        let fetcher = FakeFetcher::new()
            .route(home, html)
            .route("https://mirror.test/xyz/assets/index.a1B2c3.js", &bundle_js());
        let urls = Discoverer::new(home).discover_asset_urls(&fetcher).unwrap();
        assert_eq!(urls[&Category::FullCatalog].as_deref(), Some(FULL_URL));
    }
}
