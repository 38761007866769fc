use serde::{Deserialize, Serialize};

/// Типы торговых площадок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    Trendyol,
    Hepsiburada,
    N11,
}

impl PlatformType {
    /// Получить код площадки
    pub fn code(&self) -> &'static str {
        match self {
            PlatformType::Trendyol => "mp-trendyol",
            PlatformType::Hepsiburada => "mp-hepsiburada",
            PlatformType::N11 => "mp-n11",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformType::Trendyol => "Trendyol",
            PlatformType::Hepsiburada => "Hepsiburada",
            PlatformType::N11 => "N11",
        }
    }

    /// Получить все типы площадок
    pub fn all() -> Vec<PlatformType> {
        vec![
            PlatformType::Trendyol,
            PlatformType::Hepsiburada,
            PlatformType::N11,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mp-trendyol" => Some(PlatformType::Trendyol),
            "mp-hepsiburada" => Some(PlatformType::Hepsiburada),
            "mp-n11" => Some(PlatformType::N11),
            _ => None,
        }
    }
}

impl Default for PlatformType {
    fn default() -> Self {
        Self::Trendyol
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
