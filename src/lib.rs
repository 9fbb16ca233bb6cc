pub mod api;
pub mod config;
pub mod db;
pub mod export;
pub mod fields; // Field registry: the catalogue templates/exports refer to
pub mod models;
pub mod providers; // Provider CRUD + filtered search + aggregates
pub mod report; // Report assembly
pub mod report_logs; // Append-only send log
pub mod schedules; // Schedule record management (no execution loop)
pub mod templates; // Template CRUD + field-code validation

use thiserror::Error;

/// Error type for operations that mix input validation with storage
/// access. The API layer maps each side to its own status class.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] models::ValidationError),

    #[error(transparent)]
    Database(#[from] db::DatabaseError),
}
