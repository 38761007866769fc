use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Логгер для записи хода выполнения задания в файл.
/// Каждый лог-файл привязан к конкретной сессии выполнения.
pub struct TaskLogger {
    log_dir: String,
}

impl TaskLogger {
    pub fn new(base_log_dir: &str) -> Self {
        Self {
            log_dir: format!("{}/task_logs", base_log_dir),
        }
    }

    /// Создает директорию для логов, если она не существует.
    fn ensure_log_dir_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Возвращает путь к лог-файлу для данной сессии.
    pub fn get_log_file_path(&self, session_id: &str) -> String {
        format!("{}/{}.log", self.log_dir, session_id)
    }

    /// Записывает сообщение в лог-файл для указанной сессии.
    /// Если файл не существует, он будет создан.
    pub fn write_log(&self, session_id: &str, message: &str) -> Result<()> {
        self.ensure_log_dir_exists()?;
        let file_path = self.get_log_file_path(session_id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        writeln!(file, "[{}] {}", timestamp, message)?;
        Ok(())
    }

    /// Читает все содержимое лог-файла для указанной сессии.
    pub fn read_log(&self, session_id: &str) -> Result<String> {
        let file_path = self.get_log_file_path(session_id);
        if Path::new(&file_path).exists() {
            Ok(fs::read_to_string(&file_path)?)
        } else {
            Ok(format!("Log file for session {} not found.", session_id))
        }
    }

    /// Удаляет лог-файл для указанной сессии.
    pub fn delete_log(&self, session_id: &str) -> Result<()> {
        let file_path = self.get_log_file_path(session_id);
        if Path::new(&file_path).exists() {
            fs::remove_file(&file_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_logger() -> TaskLogger {
        let dir = std::env::temp_dir().join(format!("sync_task_logs_{}", uuid::Uuid::new_v4()));
        TaskLogger::new(&dir.to_string_lossy())
    }

    #[test]
    fn test_write_read_delete_cycle() {
        let logger = temp_logger();
        let session_id = "session-1";

        logger.write_log(session_id, "first line").unwrap();
        logger.write_log(session_id, "second line").unwrap();

        let contents = logger.read_log(session_id).unwrap();
        assert!(contents.contains("first line"));
        assert!(contents.contains("second line"));

        logger.delete_log(session_id).unwrap();
        let after = logger.read_log(session_id).unwrap();
        assert!(after.contains("not found"));
    }
}
