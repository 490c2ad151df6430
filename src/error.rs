use crate::model::Category;
use std::error::Error;
use std::fmt;

pub type RankResult<T> = Result<T, RankError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RankError {
    /// transport failure or non-2xx answer
    Http {
        url: String,
        status: Option<u16>,
        reason: String,
    },
    /// homepage or bundle unreachable, or the bundle reference is missing
    Discovery(String),
    CategoryFetch { category: Category, reason: String },
    FeedParse(String),
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::Http {
                url,
                status: Some(code),
                reason,
            } => write!(f, "GET {} returned HTTP {}: {}", url, code, reason),
            RankError::Http { url, reason, .. } => write!(f, "GET {} failed: {}", url, reason),
            RankError::Discovery(msg) => write!(f, "discovery failed: {}", msg),
            RankError::CategoryFetch { category, reason } => {
                write!(f, "fetching {} failed: {}", category.key(), reason)
            }
            RankError::FeedParse(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for RankError {}

impl From<ureq::Error> for RankError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, resp) => RankError::Http {
                url: resp.get_url().to_string(),
                status: Some(code),
                reason: resp.status_text().to_string(),
            },
            ureq::Error::Transport(t) => RankError::Http {
                url: t.url().map(|u| u.to_string()).unwrap_or_default(),
                status: None,
                reason: t.to_string(),
            },
        }
    }
}
