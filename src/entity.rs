// upstream records; missing fields fall back to defaults

use crate::model::{CatalogEntry, EpisodeEntry, Link};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Envelope {
    pub data: Option<Payload>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Payload {
    pub podcasts: Option<Vec<serde_json::Value>>,
    pub episodes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub rank: Option<u32>,
    pub name: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_count: Option<u32>,
    pub last_release_date: Option<String>,
    pub links: Option<Vec<PodcastLink>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PodcastLink {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: Option<String>,
    pub podcast_name: Option<String>,
    pub total_episodes_count: Option<u32>,
    pub link: Option<String>,
    pub post_time: Option<String>,
    pub play_count: Option<u64>,
    pub subscription: Option<u64>,
    pub primary_genre_name: Option<String>,
}

impl From<Podcast> for CatalogEntry {
    fn from(p: Podcast) -> Self {
        CatalogEntry {
            rank: p.rank.unwrap_or_default(),
            name: p.name.unwrap_or_default(),
            primary_genre_name: p.primary_genre_name.unwrap_or_default(),
            track_count: p.track_count.unwrap_or_default(),
            last_release_date: p.last_release_date.unwrap_or_default(),
            links: p
                .links
                .unwrap_or_default()
                .into_iter()
                .filter_map(|l| {
                    let url = l.url?;
                    Some(Link {
                        name: l.name.unwrap_or_default(),
                        url,
                    })
                })
                .collect(),
        }
    }
}

impl From<Episode> for EpisodeEntry {
    fn from(e: Episode) -> Self {
        EpisodeEntry {
            title: e.title.unwrap_or_default(),
            podcast_name: e.podcast_name.unwrap_or_default(),
            total_episodes_count: e.total_episodes_count.unwrap_or_default(),
            link: e.link.unwrap_or_default(),
            post_time: e.post_time.unwrap_or_default(),
            play_count: e.play_count.unwrap_or_default(),
            subscription: e.subscription.unwrap_or_default(),
            primary_genre_name: e.primary_genre_name.unwrap_or_default(),
        }
    }
}
