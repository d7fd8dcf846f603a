//! User storage backends
//!
//! The authorization predicate and the account flows talk to a [`UserStore`]
//! trait; the concrete backend is picked from configuration. The in-memory
//! backend keeps accounts in-process for development and tests, the postgres
//! backend persists them.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::models::User;
use crate::config::{Config, StoreBackend};
use crate::error::{Error, Result};

/// User lookup and mutation contract.
///
/// `find_by_identifier` resolves a sign-in identifier by exact match on
/// either the email or the username column.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;

    /// Insert a new account. Fails with `UserAlreadyExists` when the username
    /// or email is taken.
    async fn insert(&self, user: User) -> Result<()>;

    /// Mark the named account as verified
    async fn set_verified(&self, username: &str) -> Result<()>;

    /// Toggle the message-acceptance preference for a user id
    async fn set_accepting_messages(&self, user_id: &str, accepting: bool) -> Result<()>;

    /// All accounts, oldest first
    async fn list(&self) -> Result<Vec<User>>;
}

/// Open the store configured under `[database]`
pub async fn connect(config: &Config) -> Result<Arc<dyn UserStore>> {
    match config.database.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Postgres => {
            let conn = config.database.connection.as_ref().ok_or_else(|| {
                Error::Config(
                    "database.backend = \"postgres\" requires a [database.connection] section"
                        .to_string(),
                )
            })?;
            let store = PostgresStore::connect(conn).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
