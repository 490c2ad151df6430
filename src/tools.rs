// tool names, arguments and rendering; display truncation lives here

use crate::model::{CatalogEntry, Snapshot};
use crate::resolve::Resolved;
use crate::rss::{Feed, FeedReport};
use crate::service::RankService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const RANK_DATA: &str = "getXyzRankData";
pub const REFRESH: &str = "refreshXyzRankData";
pub const SEARCH: &str = "searchPodcast";
pub const FEED: &str = "getPodcastFeed";
pub const FEED_BY_NAME: &str = "getPodcastFeedByName";
pub const LIST: &str = "list";

pub const TOOLS: [(&str, &str); 5] = [
    (RANK_DATA, "Today's xyzrank podcast and episode rankings"),
    (REFRESH, "Refetch today's rankings from xyzrank"),
    (SEARCH, "Find podcasts by approximate name, args: {name}"),
    (FEED, "Parse a podcast RSS feed, args: {url}"),
    (FEED_BY_NAME, "Find a podcast by name and parse its feed, args: {name}"),
];

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Response {
    pub id: Value,
    #[serde(rename = "isError")]
    pub is_error: bool,
    pub content: String,
}

impl Response {
    fn text(id: Value, content: String) -> Self {
        Response {
            id,
            is_error: false,
            content,
        }
    }

    fn error(id: Value, content: String) -> Self {
        Response {
            id,
            is_error: true,
            content,
        }
    }
}

pub struct Tools {
    service: RankService,
    top_n: usize,
    feed_items: usize,
}

impl Tools {
    pub fn new(service: RankService, top_n: usize, feed_items: usize) -> Self {
        Tools {
            service,
            top_n,
            feed_items,
        }
    }

    /// One request line in, one response out; malformed input is an error response.
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(req) => self.call(req),
            Err(e) => Response::error(Value::Null, format!("bad request: {}", e)),
        }
    }

    pub fn call(&self, req: Request) -> Response {
        log::debug!("call {} {}", req.tool, req.args);
        let id = req.id;
        match req.tool.as_str() {
            LIST => Response::text(id, pretty(&tool_list())),
            RANK_DATA => {
                let snapshot = self.service.ensure_snapshot();
                Response::text(id, self.render_snapshot(&snapshot))
            }
            REFRESH => {
                let snapshot = self.service.refresh();
                Response::text(id, self.render_snapshot(&snapshot))
            }
            SEARCH => match arg(&req.args, "name") {
                Some(name) => {
                    let matches = self.service.resolve(name);
                    Response::text(id, render_matches(name, &matches))
                }
                None => Response::error(id, "missing argument: name".to_string()),
            },
            FEED => match arg(&req.args, "url") {
                Some(url) => {
                    let result = self.service.parse_rss(url);
                    let failed = result.is_err();
                    let text = self.render_feed(result.map(|f| (None, f)));
                    if failed {
                        Response::error(id, text)
                    } else {
                        Response::text(id, text)
                    }
                }
                None => Response::error(id, "missing argument: url".to_string()),
            },
            FEED_BY_NAME => match arg(&req.args, "name") {
                Some(name) => match self.service.feed_by_name(name) {
                    Ok((best, feed)) => {
                        Response::text(id, self.render_feed(Ok((Some(best), feed))))
                    }
                    Err(e) => Response::error(id, self.render_feed(Err(e))),
                },
                None => Response::error(id, "missing argument: name".to_string()),
            },
            other => Response::error(id, format!("unknown tool: {}", other)),
        }
    }

    pub fn render_snapshot(&self, snapshot: &Snapshot) -> String {
        let results: Vec<Value> = snapshot
            .results
            .iter()
            .map(|r| {
                json!({
                    "type": r.category,
                    "title": r.category.title(),
                    "status": r.status,
                    "total": r.data.len(),
                    "data": r.data.truncated(self.top_n),
                })
            })
            .collect();
        pretty(&json!({
            "success": snapshot.is_complete(),
            "date": snapshot.date_prefix,
            "results": results,
        }))
    }

    fn render_feed(&self, result: crate::error::RankResult<(Option<Resolved>, Feed)>) -> String {
        let (matched, report) = match result {
            Ok((matched, mut feed)) => {
                let ranking: Option<CatalogEntry> = self.service.ranking_of(&feed);
                feed.items.truncate(self.feed_items);
                let mut v =
                    serde_json::to_value(FeedReport::from(Ok(feed))).unwrap_or(Value::Null);
                v["ranking"] = json!(ranking);
                (matched, v)
            }
            Err(e) => (None, json!(FeedReport::from(Err(e)))),
        };
        match matched {
            Some(m) => pretty(&json!({ "podcast": m, "feed": report })),
            None => pretty(&report),
        }
    }
}

pub fn render_matches(query: &str, matches: &[Resolved]) -> String {
    if matches.is_empty() {
        return format!("No podcast matching \"{}\" was found.", query);
    }
    matches
        .iter()
        .map(|m| serde_json::to_string(m).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

fn arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn tool_list() -> Value {
    Value::Array(
        TOOLS
            .iter()
            .map(|(name, description)| json!({"name": name, "description": description}))
            .collect(),
    )
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|e| format!("render failed: {}", e))
}
