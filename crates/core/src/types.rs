use serde::{Deserialize, Serialize};

/// Media category a record or search result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Book,
    Film,
    Series,
    Game,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [Self::Book, Self::Film, Self::Series, Self::Game];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Film => "film",
            Self::Series => "series",
            Self::Game => "game",
        }
    }

    /// Chinese noun used in user-facing placeholder text.
    pub fn label_zh(self) -> &'static str {
        match self {
            Self::Book => "书籍",
            Self::Film => "电影",
            Self::Series => "剧集",
            Self::Game => "游戏",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

impl std::str::FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownMediaType(s.to_string()))
    }
}
