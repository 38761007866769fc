use serde::{Deserialize, Serialize};

/// Источник данных для агрегата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Trendyol Marketplace
    Trendyol,
    /// Hepsiburada Marketplace
    Hepsiburada,
    /// N11 Marketplace
    N11,
    /// Собственная система
    #[serde(rename = "self")]
    Self_,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Trendyol => "trendyol",
            Origin::Hepsiburada => "hepsiburada",
            Origin::N11 => "n11",
            Origin::Self_ => "self",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
