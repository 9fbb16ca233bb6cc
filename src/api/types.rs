//! Shared types for the API layer.

use std::sync::Arc;

use rusqlite::Connection;
use serde::Serialize;

use crate::config::Config;
use crate::db::{self, DatabaseError};

/// Shared context for all routes and middleware. Constructed once at
/// startup and injected explicitly — there is no global database handle.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
}

impl ApiContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Open a connection for the current request. SQLite connections are
    /// cheap to open and not Sync, so each handler gets its own.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.config.database_path)
    }
}

/// Standard paged listing envelope: the page of rows plus enough
/// bookkeeping for clients to render a pager.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// `ceil(total/limit)`; zero totals page to zero.
pub fn total_pages(total: i64, limit: u32) -> i64 {
    if limit == 0 {
        return 0;
    }
    (total + limit as i64 - 1) / limit as i64
}
