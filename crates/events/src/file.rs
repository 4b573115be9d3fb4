//! Append-only JSON-lines event log on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain::Event;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::{EventLogger, LoggedEvent, Result};

struct Writer {
    file: File,
    next_sequence: u64,
}

/// Event log that appends one JSON document per line to a file.
///
/// Writes are serialized through a mutex so lines never interleave and
/// sequences match file order. Reopening an existing log continues its
/// sequence.
pub struct FileEventLog {
    path: PathBuf,
    writer: Mutex<Writer>,
}

impl FileEventLog {
    /// Opens the log at `path` in append mode, creating the file and any
    /// missing parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let existing = count_lines(&path).await?;
        tracing::info!(path = %path.display(), existing, "event log opened");

        Ok(Self {
            path,
            writer: Mutex::new(Writer {
                file,
                next_sequence: existing + 1,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every event recorded at `path`, oldest first.
    pub async fn replay(path: impl AsRef<Path>) -> Result<Vec<LoggedEvent>> {
        let file = File::open(path).await?;
        let mut lines = BufReader::new(file).lines();

        let mut events = Vec::new();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }

        Ok(events)
    }
}

async fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

#[async_trait]
impl EventLogger for FileEventLog {
    #[tracing::instrument(skip(self, event), fields(kind = %event.kind()))]
    async fn log_event(&self, event: &Event) -> Result<LoggedEvent> {
        let mut writer = self.writer.lock().await;

        let logged = LoggedEvent::new(writer.next_sequence, event.clone());
        let mut line = serde_json::to_vec(&logged)?;
        line.push(b'\n');

        writer.file.write_all(&line).await?;
        writer.file.flush().await?;
        writer.next_sequence += 1;

        Ok(logged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use domain::{AddUserCommand, Command, ModifyUserCommand, Password};
    use tracing_test::traced_test;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("events-test-{}", UserId::new()))
            .join(name)
    }

    #[traced_test]
    #[tokio::test]
    async fn test_open_logs_path_once() {
        let path = temp_path("opened.log");

        FileEventLog::open(&path).await.unwrap();

        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("event log opened")).count() {
                1 => Ok(()),
                n => Err(format!("expected one open line, got {n}")),
            }
        });
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let path = temp_path("nested/dir/events.log");

        let log = FileEventLog::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(log.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_appends_json_lines_and_replays_them() {
        let path = temp_path("events.log");
        let log = FileEventLog::open(&path).await.unwrap();
        let id = UserId::new();

        log.log_event(&modify_event(id)).await.unwrap();
        log.log_event(&add_event()).await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.lines().all(|line| line.starts_with('{')));
        assert!(!raw.contains("hunter2"));

        let replayed = FileEventLog::replay(&path).await.unwrap();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed[0].sequence, 1);
        assert_eq!(replayed[0].event.user_id(), Some(id));
        assert_eq!(replayed[1].sequence, 2);
    }

    #[tokio::test]
    async fn test_reopen_continues_sequence() {
        let path = temp_path("events.log");

        {
            let log = FileEventLog::open(&path).await.unwrap();
            log.log_event(&add_event()).await.unwrap();
        }

        let log = FileEventLog::open(&path).await.unwrap();
        let logged = log.log_event(&add_event()).await.unwrap();

        assert_eq!(logged.sequence, 2);
        assert_eq!(FileEventLog::replay(&path).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_writes_do_not_interleave() {
        let path = temp_path("events.log");
        let log = std::sync::Arc::new(FileEventLog::open(&path).await.unwrap());

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let log = log.clone();
                tokio::spawn(async move { log.log_event(&add_event()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let replayed = FileEventLog::replay(&path).await.unwrap();
        let sequences: Vec<u64> = replayed.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, (1..=20).collect::<Vec<_>>());
    }

    fn add_event() -> Event {
        AddUserCommand {
            email: "j@doe.com".into(),
            password: Password::new("hunter2"),
            ..Default::default()
        }
        .encode_event()
        .unwrap()
    }

    fn modify_event(id: UserId) -> Event {
        ModifyUserCommand::new(id)
            .country("UK")
            .encode_event()
            .unwrap()
    }
}
