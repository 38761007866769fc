use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Окно дат по умолчанию: последние 30 дней
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

// ============================================================================
// Enums
// ============================================================================

/// Режим задания синхронизации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Фиксированное окно дат (явное или вычисленное из длительности)
    #[default]
    Duration,
    /// Самоопределяющееся окно + самопланирование продолжения
    Auto,
}

/// Период для обратного обхода истории заказов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPeriod {
    Week,
    Month,
    Quarter,
    Year,
    Custom,
}

impl IntervalPeriod {
    /// Длина периода в днях; для `Custom` берется `custom_days`
    pub fn days(&self, custom_days: Option<i64>) -> i64 {
        match self {
            IntervalPeriod::Week => 7,
            IntervalPeriod::Month => 30,
            IntervalPeriod::Quarter => 90,
            IntervalPeriod::Year => 365,
            IntervalPeriod::Custom => custom_days.unwrap_or(DEFAULT_WINDOW_DAYS),
        }
    }
}

// ============================================================================
// Window
// ============================================================================

/// Окно дат `[start, end)`, запрашиваемое у площадки за один запуск задания
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// Окно по умолчанию: последние 30 дней, заканчивая `now`
    pub fn default_ending_at(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(DEFAULT_WINDOW_DAYS),
            end: now,
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Параметры синхронизации задания.
///
/// Принимает и текущую форму, и устаревшую (`date_range_mode` /
/// `interval_period` / `custom_days`); устаревшие поля переводятся в
/// каноническую форму методом [`SyncConfig::normalize`] до любой другой
/// логики.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub mode: SyncMode,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    /// Размер одной пачки заказов
    pub batch_size: Option<u32>,

    /// Верхняя граница количества обработанных заказов за запуск
    pub max_orders: Option<u32>,

    /// Длительность окна в днях (режим duration без явных дат)
    pub duration_days: Option<i64>,

    /// Останавливать цепочку продолжений на первом пустом окне
    #[serde(default)]
    pub stop_at_first: bool,

    /// Период обратного обхода (auto-режим)
    pub interval_period: Option<IntervalPeriod>,

    /// Длина периода в днях для `IntervalPeriod::Custom`
    pub custom_days: Option<i64>,

    // --- устаревшая форма ---
    /// Устаревшее поле: "interval" | "fixed"
    pub date_range_mode: Option<String>,
}

/// Каноническая форма конфигурации после нормализации
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedConfig {
    pub mode: SyncMode,
    pub window: SyncWindow,
    pub batch_size: Option<u32>,
    pub max_orders: Option<u32>,
    /// Период обратного обхода истории
    pub period: IntervalPeriod,
    /// Длина периода в днях
    pub period_days: i64,
    pub stop_on_empty_window: bool,
}

impl SyncConfig {
    /// Перевести конфигурацию (включая устаревшую форму) в каноническую.
    ///
    /// Устаревшая форма `{date_range_mode: "interval", interval_period,
    /// custom_days}` дает режим duration с окном `[now - days, now]`, где
    /// `custom_days` имеет приоритет над длиной `interval_period`.
    /// Когда не задано ничего — последние 30 дней, заканчивая `now`.
    pub fn normalize(&self, now: DateTime<Utc>) -> NormalizedConfig {
        let period = self.interval_period.unwrap_or(IntervalPeriod::Month);
        let period_days = self.custom_days.unwrap_or_else(|| period.days(self.custom_days));

        let (mode, window) = match self.date_range_mode.as_deref() {
            // Устаревшая форма "interval": duration-окно от "сейчас";
            // custom_days имеет приоритет над длиной периода
            Some("interval") => (
                SyncMode::Duration,
                SyncWindow {
                    start: now - Duration::days(period_days),
                    end: now,
                },
            ),
            // Устаревшая форма "fixed": явные даты сохраняются как есть
            Some(_) => (SyncMode::Duration, self.window_from_dates(now)),
            None => (self.mode, self.window_from_dates(now)),
        };

        NormalizedConfig {
            mode,
            window,
            batch_size: self.batch_size,
            max_orders: self.max_orders,
            period,
            period_days,
            stop_on_empty_window: self.stop_at_first,
        }
    }

    /// Окно из явных дат; при их отсутствии — из длительности или дефолт
    fn window_from_dates(&self, now: DateTime<Utc>) -> SyncWindow {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => SyncWindow { start, end },
            (Some(start), None) => SyncWindow { start, end: now },
            _ => match self.duration_days {
                Some(days) => SyncWindow {
                    start: now - Duration::days(days),
                    end: now,
                },
                None => SyncWindow::default_ending_at(now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_config_gives_30_day_window() {
        let normalized = SyncConfig::default().normalize(now());
        assert_eq!(normalized.mode, SyncMode::Duration);
        assert_eq!(normalized.window.end, now());
        assert_eq!(normalized.window.start, now() - Duration::days(30));
    }

    #[test]
    fn test_legacy_interval_config_custom_days_wins() {
        let config = SyncConfig {
            date_range_mode: Some("interval".to_string()),
            interval_period: Some(IntervalPeriod::Month),
            custom_days: Some(45),
            ..Default::default()
        };
        let normalized = config.normalize(now());
        assert_eq!(normalized.mode, SyncMode::Duration);
        assert_eq!(normalized.window.end, now());
        assert_eq!(normalized.window.start, now() - Duration::days(45));
    }

    #[test]
    fn test_legacy_interval_without_custom_days_uses_period() {
        let config = SyncConfig {
            date_range_mode: Some("interval".to_string()),
            interval_period: Some(IntervalPeriod::Week),
            ..Default::default()
        };
        let normalized = config.normalize(now());
        assert_eq!(normalized.window.start, now() - Duration::days(7));
    }

    #[test]
    fn test_legacy_fixed_keeps_explicit_dates() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let config = SyncConfig {
            date_range_mode: Some("fixed".to_string()),
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        };
        let normalized = config.normalize(now());
        assert_eq!(normalized.mode, SyncMode::Duration);
        assert_eq!(normalized.window, SyncWindow { start, end });
    }

    #[test]
    fn test_explicit_dates_pass_through() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let config = SyncConfig {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        };
        let normalized = config.normalize(now());
        assert_eq!(normalized.window, SyncWindow { start, end });
    }

    #[test]
    fn test_auto_mode_survives_normalization() {
        let config = SyncConfig {
            mode: SyncMode::Auto,
            interval_period: Some(IntervalPeriod::Quarter),
            ..Default::default()
        };
        let normalized = config.normalize(now());
        assert_eq!(normalized.mode, SyncMode::Auto);
        assert_eq!(normalized.period_days, 90);
    }
}
