use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "fullData")]
    FullCatalog,
    #[serde(rename = "newPodcasts")]
    NewPodcasts,
    #[serde(rename = "hotPodcasts")]
    HotEpisodes,
    #[serde(rename = "hotNewPodcasts")]
    NewEpisodes,
}

impl Category {
    /// fixed order of every snapshot
    pub const ALL: [Category; 4] = [
        Category::FullCatalog,
        Category::NewPodcasts,
        Category::HotEpisodes,
        Category::NewEpisodes,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::FullCatalog => "fullData",
            Category::NewPodcasts => "newPodcasts",
            Category::HotEpisodes => "hotPodcasts",
            Category::NewEpisodes => "hotNewPodcasts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::FullCatalog => "Top podcasts",
            Category::NewPodcasts => "Top new podcasts",
            Category::HotEpisodes => "Hot episodes",
            Category::NewEpisodes => "Hot episodes of new podcasts",
        }
    }

    pub fn is_catalog(&self) -> bool {
        matches!(self, Category::FullCatalog | Category::NewPodcasts)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub rank: u32,
    pub name: String,
    pub primary_genre_name: String,
    pub track_count: u32,
    pub last_release_date: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeEntry {
    pub title: String,
    pub podcast_name: String,
    pub total_episodes_count: u32,
    pub link: String,
    pub post_time: String,
    pub play_count: u64,
    pub subscription: u64,
    pub primary_genre_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entries {
    Podcasts(Vec<CatalogEntry>),
    Episodes(Vec<EpisodeEntry>),
}

impl Entries {
    pub fn empty(category: Category) -> Self {
        if category.is_catalog() {
            Entries::Podcasts(Vec::new())
        } else {
            Entries::Episodes(Vec::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Entries::Podcasts(v) => v.len(),
            Entries::Episodes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn truncated(&self, n: usize) -> Self {
        match self {
            Entries::Podcasts(v) => Entries::Podcasts(v.iter().take(n).cloned().collect()),
            Entries::Episodes(v) => Entries::Episodes(v.iter().take(n).cloned().collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    #[serde(rename = "type")]
    pub category: Category,
    pub status: bool,
    pub data: Entries,
}

impl CategoryResult {
    pub fn ok(category: Category, data: Entries) -> Self {
        CategoryResult {
            category,
            status: true,
            data,
        }
    }

    pub fn failed(category: Category) -> Self {
        CategoryResult {
            category,
            status: false,
            data: Entries::empty(category),
        }
    }

    pub fn podcasts(&self) -> &[CatalogEntry] {
        match &self.data {
            Entries::Podcasts(v) => v,
            Entries::Episodes(_) => &[],
        }
    }

    pub fn episodes(&self) -> &[EpisodeEntry] {
        match &self.data {
            Entries::Episodes(v) => v,
            Entries::Podcasts(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub date_prefix: String,
    pub results: Vec<CategoryResult>,
}

impl Snapshot {
    pub fn empty(date_prefix: String) -> Self {
        Snapshot {
            date_prefix,
            results: Vec::new(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryResult> {
        self.results.iter().find(|r| r.category == category)
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        self.get(Category::FullCatalog)
            .map(|r| r.podcasts())
            .unwrap_or(&[])
    }

    /// every category present and fetched without error
    pub fn is_complete(&self) -> bool {
        Category::ALL
            .iter()
            .all(|c| self.get(*c).map(|r| r.status).unwrap_or(false))
    }
}
