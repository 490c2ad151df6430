use crate::discover::HOMEPAGE_URL;
use crate::resolve::{
    Resolver, DEFAULT_LIMIT, DEFAULT_RSS_TEMPLATE, DEFAULT_SITE_LINK, DEFAULT_THRESHOLD,
};
use simple_error::SimpleError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub homepage: String,
    pub fuzzy_threshold: f64,
    pub fuzzy_limit: usize,
    pub rss_template: String,
    pub site_link: String,
    /// entries per category shown by the ranking tool
    pub top_n: usize,
    /// items shown by the feed tools
    pub feed_items: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            homepage: HOMEPAGE_URL.to_string(),
            fuzzy_threshold: DEFAULT_THRESHOLD,
            fuzzy_limit: DEFAULT_LIMIT,
            rss_template: DEFAULT_RSS_TEMPLATE.to_string(),
            site_link: DEFAULT_SITE_LINK.to_string(),
            top_n: 5,
            feed_items: 15,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, SimpleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SimpleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(v) = lookup("XYZRANK_HOMEPAGE") {
            if !v.starts_with("http") {
                return Err(SimpleError::new(format!(
                    "XYZRANK_HOMEPAGE must be an http(s) url, got {}",
                    v
                )));
            }
            config.homepage = v;
        }
        if let Some(v) = lookup("XYZRANK_FUZZY_THRESHOLD") {
            config.fuzzy_threshold = parse("XYZRANK_FUZZY_THRESHOLD", &v)?;
            if !(0.0..=1.0).contains(&config.fuzzy_threshold) {
                return Err(SimpleError::new(format!(
                    "XYZRANK_FUZZY_THRESHOLD must be within 0..=1, got {}",
                    v
                )));
            }
        }
        if let Some(v) = lookup("XYZRANK_FUZZY_LIMIT") {
            config.fuzzy_limit = parse("XYZRANK_FUZZY_LIMIT", &v)?;
        }
        if let Some(v) = lookup("XYZRANK_RSS_TEMPLATE") {
            if !v.contains("{id}") {
                return Err(SimpleError::new(format!(
                    "XYZRANK_RSS_TEMPLATE needs an {{id}} placeholder, got {}",
                    v
                )));
            }
            config.rss_template = v;
        }
        if let Some(v) = lookup("XYZRANK_SITE_LINK") {
            config.site_link = v;
        }
        if let Some(v) = lookup("XYZRANK_TOP_N") {
            config.top_n = parse("XYZRANK_TOP_N", &v)?;
        }
        if let Some(v) = lookup("XYZRANK_FEED_ITEMS") {
            config.feed_items = parse("XYZRANK_FEED_ITEMS", &v)?;
        }
        Ok(config)
    }

    pub fn resolver(&self) -> Resolver {
        Resolver {
            threshold: self.fuzzy_threshold,
            limit: self.fuzzy_limit,
            rss_template: self.rss_template.clone(),
            site_link: self.site_link.clone(),
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, SimpleError> {
    value
        .trim()
        .parse()
        .map_err(|_| SimpleError::new(format!("{} is not valid: {}", key, value)))
}
