use contracts::system::tasks::progress::{ProgressUpdate, SyncPhase};
use std::time::{Duration, Instant};

/// Счетчик прогресса одного запуска: процент, скорость, оценка остатка
pub struct ProgressReporter {
    started: Instant,
    total: Option<i32>,
}

impl ProgressReporter {
    pub fn new(total: Option<i32>) -> Self {
        Self {
            started: Instant::now(),
            total,
        }
    }

    /// Снимок прогресса на текущий момент
    pub fn snapshot(&self, current: i32, message: String, phase: SyncPhase) -> ProgressUpdate {
        self.snapshot_with_elapsed(current, self.started.elapsed(), message, phase)
    }

    /// Снимок с явным elapsed (выделено для детерминированных тестов)
    pub fn snapshot_with_elapsed(
        &self,
        current: i32,
        elapsed: Duration,
        message: String,
        phase: SyncPhase,
    ) -> ProgressUpdate {
        let percent = self
            .total
            .filter(|t| *t > 0)
            .map(|t| (current as f32 / t as f32) * 100.0);

        let secs = elapsed.as_secs_f64();
        let rate_per_sec = if current > 0 && secs > 0.0 {
            Some(current as f64 / secs)
        } else {
            None
        };

        let eta_seconds = match (rate_per_sec, self.total) {
            (Some(rate), Some(total)) if rate > 0.0 && total > current => {
                Some(((total - current) as f64 / rate).ceil() as i64)
            }
            _ => None,
        };

        ProgressUpdate {
            current,
            total: self.total,
            percent,
            rate_per_sec,
            eta_seconds,
            message,
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_rate() {
        let reporter = ProgressReporter::new(Some(100));
        let update = reporter.snapshot_with_elapsed(
            25,
            Duration::from_secs(5),
            "Processing".to_string(),
            SyncPhase::Processing,
        );
        assert_eq!(update.percent, Some(25.0));
        assert_eq!(update.rate_per_sec, Some(5.0));
        // 75 оставшихся при 5 зак/с
        assert_eq!(update.eta_seconds, Some(15));
    }

    #[test]
    fn test_no_rate_before_first_order() {
        let reporter = ProgressReporter::new(Some(10));
        let update = reporter.snapshot_with_elapsed(
            0,
            Duration::from_secs(3),
            "Fetching".to_string(),
            SyncPhase::Fetching,
        );
        assert_eq!(update.rate_per_sec, None);
        assert_eq!(update.eta_seconds, None);
    }

    #[test]
    fn test_unknown_total_gives_no_percent() {
        let reporter = ProgressReporter::new(None);
        let update = reporter.snapshot_with_elapsed(
            7,
            Duration::from_secs(1),
            "Processing".to_string(),
            SyncPhase::Processing,
        );
        assert_eq!(update.percent, None);
        assert_eq!(update.eta_seconds, None);
        assert_eq!(update.rate_per_sec, Some(7.0));
    }
}
