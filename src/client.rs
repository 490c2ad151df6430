use crate::error::{RankError, RankResult};
use std::io::Read;

/// browser-like header set, the site rejects bare clients
pub const COMMON_HEADERS: [(&str, &str); 13] = [
    ("accept", "application/json, text/plain, */*"),
    (
        "accept-language",
        "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6",
    ),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    ("priority", "u=1, i"),
    (
        "sec-ch-ua",
        "\"Not(A:Brand\";v=\"99\", \"Microsoft Edge\";v=\"133\", \"Chromium\";v=\"133\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("Referer", "https://xyzrank.com/?from=itab"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
];

pub trait Fetcher: Send + Sync {
    fn get_text(&self, url: &str) -> RankResult<String>;
}

pub struct Client {
    agent: ureq::Agent,
    headers: Vec<(String, String)>,
}

impl Client {
    pub fn new() -> Self {
        Client {
            agent: ureq::AgentBuilder::new().build(),
            headers: COMMON_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// plain GET without the browser headers, for third-party feed hosts
    pub fn open(&self, url: &str) -> RankResult<impl Read + Send> {
        log::debug!("GET {}", url);
        Ok(self.agent.get(url).call()?.into_reader())
    }

    fn request(&self, url: &str) -> ureq::Request {
        self.headers
            .iter()
            .fold(self.agent.get(url), |req, (k, v)| req.set(k, v))
    }
}

impl Default for Client {
    fn default() -> Self {
        Client::new()
    }
}

impl Fetcher for Client {
    fn get_text(&self, url: &str) -> RankResult<String> {
        log::debug!("GET {}", url);
        let resp = self.request(url).call()?;
        resp.into_string().map_err(|e| RankError::Http {
            url: url.to_string(),
            status: None,
            reason: format!("unreadable body: {}", e),
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// canned responses keyed by URL; anything else answers 404
    #[derive(Default)]
    pub struct FakeFetcher {
        routes: Mutex<HashMap<String, Result<String, u16>>>,
        hits: Mutex<HashMap<String, usize>>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(self, url: &str, body: &str) -> Self {
            self.set(url, Ok(body.to_string()));
            self
        }

        pub fn fail(self, url: &str, status: u16) -> Self {
            self.set(url, Err(status));
            self
        }

        pub fn set(&self, url: &str, answer: Result<String, u16>) {
            self.routes
                .lock()
                .unwrap()
                .insert(url.to_string(), answer);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn hits(&self, url: &str) -> usize {
            self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    impl Fetcher for FakeFetcher {
        fn get_text(&self, url: &str) -> RankResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            match self.routes.lock().unwrap().get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(code)) => Err(RankError::Http {
                    url: url.to_string(),
                    status: Some(*code),
                    reason: "canned failure".to_string(),
                }),
                None => Err(RankError::Http {
                    url: url.to_string(),
                    status: Some(404),
                    reason: "Not Found".to_string(),
                }),
            }
        }
    }
}
