//! Flat-file record store.
//!
//! # Responsibility
//! - Map the `RecordStore` contract onto four text files in one directory.
//! - Create default store content on first start.
//!
//! # Invariants
//! - Absence of a record file is never an error; other read failures are.
//! - Every save rewrites the whole file.
//!
//! # See also
//! - `repo::record_codec` for the line format.

use super::record_codec::{decode_tasks, decode_users, encode_tasks, encode_users};
use super::{RecordStore, RepoError, RepoResult};
use crate::model::task::Task;
use crate::model::user::User;
use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const USERS_FILE_NAME: &str = "users.txt";
pub const TASKS_FILE_NAME: &str = "tasks.txt";
pub const TASK_REPORT_FILE_NAME: &str = "task_overview.txt";
pub const USER_REPORT_FILE_NAME: &str = "user_overview.txt";

/// Record store backed by text files under one data directory.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// Opens a store rooted at `dir`, creating the directory when missing.
    pub fn open(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| {
            error!(
                "event=store_open module=repo status=error dir={} error={}",
                dir.display(),
                source
            );
            RepoError::Io {
                path: dir.clone(),
                source,
            }
        })?;
        info!(
            "event=store_open module=repo status=ok dir={}",
            dir.display()
        );
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.join(USERS_FILE_NAME)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE_NAME)
    }

    pub fn task_report_path(&self) -> PathBuf {
        self.dir.join(TASK_REPORT_FILE_NAME)
    }

    pub fn user_report_path(&self) -> PathBuf {
        self.dir.join(USER_REPORT_FILE_NAME)
    }

    /// Reads a record file, seeding it with `default` when absent.
    fn read_or_seed(&self, path: &Path, default: &str) -> RepoResult<String> {
        if !path.exists() {
            info!(
                "event=store_seed module=repo status=start file={}",
                path.display()
            );
            write_file(path, default)?;
        }
        read_file(path)
    }
}

impl RecordStore for FileRecordStore {
    fn load_users(&self) -> RepoResult<Vec<User>> {
        let started_at = Instant::now();
        let path = self.users_path();
        let text = self.read_or_seed(&path, &encode_users(&[User::default_admin()]))?;
        let users = decode_users(&text).map_err(|source| {
            error!(
                "event=users_load module=repo status=error line={} error={}",
                source.line, source.message
            );
            RepoError::InvalidRecord {
                path: path.clone(),
                source,
            }
        })?;
        info!(
            "event=users_load module=repo status=ok count={} duration_ms={}",
            users.len(),
            started_at.elapsed().as_millis()
        );
        Ok(users)
    }

    fn save_users(&self, users: &[User]) -> RepoResult<()> {
        write_file(&self.users_path(), &encode_users(users))?;
        info!(
            "event=users_save module=repo status=ok count={}",
            users.len()
        );
        Ok(())
    }

    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let path = self.tasks_path();
        let text = self.read_or_seed(&path, "")?;
        let tasks = decode_tasks(&text).map_err(|source| {
            error!(
                "event=tasks_load module=repo status=error line={} error={}",
                source.line, source.message
            );
            RepoError::InvalidRecord {
                path: path.clone(),
                source,
            }
        })?;
        info!(
            "event=tasks_load module=repo status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        write_file(&self.tasks_path(), &encode_tasks(tasks))?;
        info!(
            "event=tasks_save module=repo status=ok count={}",
            tasks.len()
        );
        Ok(())
    }

    fn load_task_report(&self) -> RepoResult<Option<String>> {
        read_optional(&self.task_report_path())
    }

    fn save_task_report(&self, text: &str) -> RepoResult<()> {
        write_file(&self.task_report_path(), text)
    }

    fn load_user_report(&self) -> RepoResult<Option<String>> {
        read_optional(&self.user_report_path())
    }

    fn save_user_report(&self, text: &str) -> RepoResult<()> {
        write_file(&self.user_report_path(), text)
    }
}

fn read_file(path: &Path) -> RepoResult<String> {
    std::fs::read_to_string(path).map_err(|source| {
        error!(
            "event=file_read module=repo status=error file={} error={}",
            path.display(),
            source
        );
        RepoError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn read_optional(path: &Path) -> RepoResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => {
            error!(
                "event=file_read module=repo status=error file={} error={}",
                path.display(),
                source
            );
            Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

fn write_file(path: &Path, contents: &str) -> RepoResult<()> {
    std::fs::write(path, contents).map_err(|source| {
        warn!(
            "event=file_write module=repo status=error file={} error={}",
            path.display(),
            source
        );
        RepoError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
