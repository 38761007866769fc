use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Ручка управления одним выполняющимся заданием: отмена и пауза.
///
/// Отмена невосстановима (исполнитель откатывает транзакцию и выходит);
/// пауза — мягкая приостановка перед очередным заказом без потери уже
/// обработанного состояния.
#[derive(Clone)]
pub struct TaskControlHandle {
    cancelled: Arc<AtomicBool>,
    pause_tx: Arc<watch::Sender<bool>>,
}

impl TaskControlHandle {
    pub fn new() -> Self {
        let (pause_tx, _rx) = watch::channel(false);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            pause_tx: Arc::new(pause_tx),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // Разбудить приостановленное задание, чтобы оно увидело отмену
        let _ = self.pause_tx.send(false);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        let _ = self.pause_tx.send(true);
    }

    pub fn resume(&self) {
        let _ = self.pause_tx.send(false);
    }

    pub fn is_paused(&self) -> bool {
        *self.pause_tx.borrow()
    }

    /// Дождаться возобновления, если задание на паузе
    pub async fn wait_if_paused(&self) {
        let mut rx = self.pause_tx.subscribe();
        while *rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for TaskControlHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Центр управления выполняющимися заданиями (in-memory).
/// Ключ — id задания; ручки живут от старта до завершения запуска.
pub struct TaskControlCenter {
    handles: RwLock<HashMap<String, TaskControlHandle>>,
}

impl TaskControlCenter {
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Зарегистрировать запуск задания и получить его ручку
    pub fn register(&self, task_id: &str) -> TaskControlHandle {
        let handle = TaskControlHandle::new();
        let mut handles = self.handles.write().unwrap();
        handles.insert(task_id.to_string(), handle.clone());
        handle
    }

    pub fn get(&self, task_id: &str) -> Option<TaskControlHandle> {
        let handles = self.handles.read().unwrap();
        handles.get(task_id).cloned()
    }

    pub fn remove(&self, task_id: &str) {
        let mut handles = self.handles.write().unwrap();
        handles.remove(task_id);
    }

    /// Запросить отмену задания; false — задание сейчас не выполняется
    pub fn cancel(&self, task_id: &str) -> bool {
        match self.get(task_id) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

impl Default for TaskControlCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag() {
        let center = TaskControlCenter::new();
        let handle = center.register("t1");
        assert!(!handle.is_cancelled());
        assert!(center.cancel("t1"));
        assert!(handle.is_cancelled());
        assert!(!center.cancel("missing"));
    }

    #[tokio::test]
    async fn test_pause_and_resume() {
        let handle = TaskControlHandle::new();
        handle.pause();
        assert!(handle.is_paused());

        let waiter = handle.clone();
        let join = tokio::spawn(async move {
            waiter.wait_if_paused().await;
        });

        // Пока пауза активна, ожидание не завершается
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!join.is_finished());

        handle.resume();
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_not_paused() {
        let handle = TaskControlHandle::new();
        handle.wait_if_paused().await;
    }
}
