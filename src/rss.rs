use crate::client::Client;
use crate::error::{RankError, RankResult};
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BasicInfo {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Enclosure {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub enclosure: Option<Enclosure>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub basic_info: BasicInfo,
    pub items: Vec<FeedItem>,
}

/// Wire shape handed to callers: `result` is null on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedReport {
    pub status: bool,
    pub result: Option<Feed>,
    pub message: String,
}

impl From<RankResult<Feed>> for FeedReport {
    fn from(r: RankResult<Feed>) -> Self {
        match r {
            Ok(feed) => FeedReport {
                status: true,
                result: Some(feed),
                message: "ok".to_string(),
            },
            Err(e) => FeedReport {
                status: false,
                result: None,
                message: e.to_string(),
            },
        }
    }
}

pub trait Parser: Send + Sync {
    fn parse_rss(&self, url: &str) -> RankResult<Feed>;
}

pub mod feed {
    use super::*;
    use feed_rs::model::Entry;

    pub struct FeedClient {
        client: Client,
    }

    impl FeedClient {
        pub fn new(client: Client) -> Self {
            FeedClient { client }
        }
    }

    impl Parser for FeedClient {
        fn parse_rss(&self, url: &str) -> RankResult<Feed> {
            check_url(url)?;
            let reader = self.client.open(url).map_err(|e| {
                RankError::FeedParse(format!("parse {} error: {}", url, e))
            })?;
            parse(url, reader)
        }
    }

    pub fn parse(url: &str, reader: impl Read) -> RankResult<Feed> {
        let feed = feed_rs::parser::parse(reader)
            .map_err(|e| RankError::FeedParse(format!("parse {} error: {}", url, e)))?;
        let basic_info = BasicInfo {
            title: feed.title.map(|t| t.content).unwrap_or_default(),
            description: feed.description.map(|t| t.content).unwrap_or_default(),
            link: feed
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default(),
            image: feed
                .logo
                .or(feed.icon)
                .map(|i| i.uri)
                .unwrap_or_default(),
        };
        let items = feed.entries.iter().map(item).collect();
        log::debug!("parsed feed {}", basic_info.title);
        Ok(Feed { basic_info, items })
    }

    fn item(entry: &Entry) -> FeedItem {
        FeedItem {
            title: entry
                .title
                .as_ref()
                .map(|t| t.content.clone())
                .unwrap_or_default(),
            link: entry_link(entry),
            pub_date: entry
                .published
                .or(entry.updated)
                .map(|d| d.to_rfc2822())
                .unwrap_or_default(),
            enclosure: enclosure(entry),
            content: entry
                .content
                .as_ref()
                .and_then(|c| c.body.clone())
                .or_else(|| entry.summary.as_ref().map(|s| s.content.clone()))
                .unwrap_or_default(),
        }
    }

    fn entry_link(entry: &Entry) -> String {
        entry
            .links
            .iter()
            .find(|l| {
                let rel = l.rel.as_deref().unwrap_or("");
                rel.is_empty() || rel.eq_ignore_ascii_case("alternate")
            })
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone())
            .unwrap_or_default()
    }

    fn enclosure(entry: &Entry) -> Option<Enclosure> {
        for media in &entry.media {
            for content in &media.content {
                if let Some(url) = content.url.as_ref() {
                    return Some(Enclosure {
                        url: url.to_string(),
                        media_type: content
                            .content_type
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_default(),
                    });
                }
            }
        }
        entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("enclosure"))
            .map(|l| Enclosure {
                url: l.href.clone(),
                media_type: l.media_type.clone().unwrap_or_default(),
            })
    }
}

pub fn check_url(url: &str) -> RankResult<()> {
    if url.starts_with("http") {
        Ok(())
    } else {
        Err(RankError::FeedParse(format!("invalid url: {}", url)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Ocean Waves Radio</title>
    <link>https://ocean.example.com/</link>
    <description>Sounds of the sea</description>
    <image><url>https://ocean.example.com/cover.jpg</url><title>Ocean Waves Radio</title><link>https://ocean.example.com/</link></image>
    <item>
      <title>Episode 2: Tides</title>
      <link>https://ocean.example.com/2</link>
      <pubDate>Sat, 09 Mar 2024 10:00:00 +0000</pubDate>
      <description>Tides explained</description>
      <enclosure url="https://cdn.example.com/2.mp3" length="1234" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode 1: Waves</title>
      <link>https://ocean.example.com/1</link>
      <pubDate>Fri, 01 Mar 2024 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_basic_info_and_items() {
        let feed = feed::parse("https://ocean.example.com/rss", RSS.as_bytes()).unwrap();
        assert_eq!(feed.basic_info.title, "Ocean Waves Radio");
        assert_eq!(feed.basic_info.description, "Sounds of the sea");
        assert_eq!(feed.basic_info.image, "https://ocean.example.com/cover.jpg");
        assert_eq!(feed.items.len(), 2);
        let first = &feed.items[0];
        assert_eq!(first.title, "Episode 2: Tides");
        assert_eq!(first.link, "https://ocean.example.com/2");
        assert!(first.pub_date.contains("9 Mar 2024") || first.pub_date.contains("09 Mar 2024"));
        let enc = first.enclosure.as_ref().unwrap();
        assert_eq!(enc.url, "https://cdn.example.com/2.mp3");
        assert_eq!(enc.media_type, "audio/mpeg");
        assert!(feed.items[1].enclosure.is_none());
    }

    #[test]
    fn garbage_is_feed_parse_error() {
        match feed::parse("https://x.test/rss", "not a feed".as_bytes()) {
            Err(RankError::FeedParse(msg)) => {
                assert!(msg.starts_with("parse https://x.test/rss error"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_non_http_urls() {
        let client = feed::FeedClient::new(Client::new());
        let report = FeedReport::from(client.parse_rss("ftp://x.test/rss"));
        assert!(!report.status);
        assert!(report.result.is_none());
        assert_eq!(report.message, "invalid url: ftp://x.test/rss");
    }

    #[test]
    fn report_wire_shape() {
        let report = FeedReport::from(feed::parse("https://ocean.example.com/rss", RSS.as_bytes()));
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["status"], true);
        assert_eq!(v["message"], "ok");
        assert_eq!(v["result"]["basicInfo"]["title"], "Ocean Waves Radio");
        assert_eq!(v["result"]["items"][0]["enclosure"]["type"], "audio/mpeg");
        assert!(v["result"]["items"][0]["pubDate"].is_string());
    }
}
