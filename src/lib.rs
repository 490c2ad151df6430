pub mod cache;
pub mod client;
pub mod config;
pub mod discover;
pub mod entity;
pub mod error;
pub mod fuzzy;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod rss;
pub mod service;
pub mod stdio;
pub mod tools;
pub mod util;

use cache::{DayCache, LocalClock};
use client::Client;
use config::Config;
use discover::Discoverer;
use service::RankService;

// default wiring: live site, local calendar, feed_rs parser
pub fn get_service(config: &Config) -> RankService {
    let cache = DayCache::new(
        Box::new(Client::new()),
        Discoverer::new(&config.homepage),
        Box::new(LocalClock),
    );
    let parser = rss::feed::FeedClient::new(Client::new());
    RankService::new(cache, config.resolver(), Box::new(parser))
}

pub fn get_tools(config: &Config) -> tools::Tools {
    tools::Tools::new(get_service(config), config.top_n, config.feed_items)
}
