//! Persistence adapter for users, tasks and generated reports.
//!
//! # Responsibility
//! - Define the load/save contract consumed by services (`RecordStore`).
//! - Keep the semicolon record format and file layout out of the domain.
//!
//! # Invariants
//! - Stores are read whole and rewritten whole; there is no partial update.
//! - A missing user store is created with the seed admin account.
//! - A missing task store is created empty.

pub mod file_store;
pub mod record_codec;

use crate::model::task::Task;
use crate::model::user::User;
use record_codec::RecordError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure.
#[derive(Debug)]
pub enum RepoError {
    /// File could not be created, read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A persisted line could not be decoded.
    InvalidRecord { path: PathBuf, source: RecordError },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "error accessing `{}`: {source}", path.display()),
            Self::InvalidRecord { path, source } => {
                write!(f, "invalid record in `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidRecord { source, .. } => Some(source),
        }
    }
}

/// Load/save contract for the two record stores and the two report blobs.
pub trait RecordStore {
    fn load_users(&self) -> RepoResult<Vec<User>>;
    fn save_users(&self, users: &[User]) -> RepoResult<()>;
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    /// Returns `None` when no task report has been generated yet.
    fn load_task_report(&self) -> RepoResult<Option<String>>;
    fn save_task_report(&self, text: &str) -> RepoResult<()>;
    /// Returns `None` when no user report has been generated yet.
    fn load_user_report(&self) -> RepoResult<Option<String>>;
    fn save_user_report(&self, text: &str) -> RepoResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load_users(&self) -> RepoResult<Vec<User>> {
        (**self).load_users()
    }

    fn save_users(&self, users: &[User]) -> RepoResult<()> {
        (**self).save_users(users)
    }

    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).load_tasks()
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        (**self).save_tasks(tasks)
    }

    fn load_task_report(&self) -> RepoResult<Option<String>> {
        (**self).load_task_report()
    }

    fn save_task_report(&self, text: &str) -> RepoResult<()> {
        (**self).save_task_report(text)
    }

    fn load_user_report(&self) -> RepoResult<Option<String>> {
        (**self).load_user_report()
    }

    fn save_user_report(&self, text: &str) -> RepoResult<()> {
        (**self).save_user_report(text)
    }
}
