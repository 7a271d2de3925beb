pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    compute_split, Actor, Enrollment, Role, Split, StudentId, Subject, SubjectId, SubjectStatus,
    TeacherId, TimeMs, Transaction, TransactionStatus, TransactionType,
};
pub use engine::LedgerEngine;
pub use error::{AppError, LedgerError};
