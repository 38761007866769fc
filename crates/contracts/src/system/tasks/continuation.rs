use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::config::SyncWindow;

/// Токен продолжения, передаваемый от задания к его потомку в цепочке
/// auto-синхронизации. Несет самую раннюю дату заказа, увиденную цепочкой,
/// и порядковый номер звена — вместо слабо типизированных полей metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuationToken {
    /// Самая ранняя дата заказа, достигнутая цепочкой
    pub oldest_order_date: DateTime<Utc>,
    /// Номер звена цепочки (первое задание = 0)
    pub iteration: i32,
}

impl ContinuationToken {
    pub fn new(oldest_order_date: DateTime<Utc>, iteration: i32) -> Self {
        Self {
            oldest_order_date,
            iteration,
        }
    }

    /// Следующее звено: дата сдвигается к `next_oldest`, счетчик растет
    pub fn advance(&self, next_oldest: DateTime<Utc>) -> Self {
        Self {
            oldest_order_date: next_oldest,
            iteration: self.iteration + 1,
        }
    }
}

/// Вычислить следующее окно обратного обхода истории:
/// `end = oldest_order_date`, `start = end - period_days`.
/// Каждое звено цепочки монотонно уходит назад во времени.
pub fn compute_backward_window(oldest_order_date: DateTime<Utc>, period_days: i64) -> SyncWindow {
    SyncWindow {
        start: oldest_order_date - Duration::days(period_days),
        end: oldest_order_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backward_window_one_month() {
        let oldest = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let window = compute_backward_window(oldest, 30);
        assert_eq!(window.end, oldest);
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_backward_windows_are_monotonic() {
        let oldest = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let first = compute_backward_window(oldest, 90);
        let second = compute_backward_window(first.start, 90);
        assert!(second.end <= first.end);
        assert!(second.start < first.start);
    }

    #[test]
    fn test_token_advance() {
        let oldest = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let token = ContinuationToken::new(oldest, 0);
        let next = token.advance(oldest - chrono::Duration::days(30));
        assert_eq!(next.iteration, 1);
        assert!(next.oldest_order_date < token.oldest_order_date);
    }
}
