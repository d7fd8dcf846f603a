//! PostgreSQL user store

use async_trait::async_trait;
use tokio_postgres::{Client, Row};

use super::UserStore;
use crate::auth::models::User;
use crate::config::DatabaseConnection;
use crate::error::{Error, Result};

/// PostgreSQL-backed user storage
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Connect using the `[database.connection]` settings
    pub async fn connect(conn: &DatabaseConnection) -> Result<Self> {
        let conn_string = format!(
            "host={} port={} user={} password={} dbname={}",
            conn.host, conn.port, conn.user, conn.password, conn.dbname
        );

        let (client, connection) = tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
            .await
            .map_err(Error::Database)?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Create the users table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    verify_code TEXT NOT NULL,
                    verify_code_expires_at TIMESTAMPTZ NOT NULL,
                    is_verified BOOLEAN NOT NULL,
                    is_accepting_messages BOOLEAN NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL
                )",
            )
            .await?;
        tracing::debug!("Ensured users table exists");
        Ok(())
    }
}

fn row_to_user(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        verify_code: row.get("verify_code"),
        verify_code_expires_at: row.get("verify_code_expires_at"),
        is_verified: row.get("is_verified"),
        is_accepting_messages: row.get("is_accepting_messages"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT * FROM users WHERE email = $1 OR username = $1",
                &[&identifier],
            )
            .await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn insert(&self, user: User) -> Result<()> {
        let inserted = self
            .client
            .execute(
                "INSERT INTO users (
                    id, username, email, password_hash, verify_code,
                    verify_code_expires_at, is_verified, is_accepting_messages, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT DO NOTHING",
                &[
                    &user.id,
                    &user.username,
                    &user.email,
                    &user.password_hash,
                    &user.verify_code,
                    &user.verify_code_expires_at,
                    &user.is_verified,
                    &user.is_accepting_messages,
                    &user.created_at,
                ],
            )
            .await?;

        if inserted == 0 {
            return Err(Error::UserAlreadyExists(user.username));
        }
        Ok(())
    }

    async fn set_verified(&self, username: &str) -> Result<()> {
        let updated = self
            .client
            .execute(
                "UPDATE users SET is_verified = TRUE WHERE username = $1",
                &[&username],
            )
            .await?;

        if updated == 0 {
            return Err(Error::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    async fn set_accepting_messages(&self, user_id: &str, accepting: bool) -> Result<()> {
        let updated = self
            .client
            .execute(
                "UPDATE users SET is_accepting_messages = $2 WHERE id = $1",
                &[&user_id, &accepting],
            )
            .await?;

        if updated == 0 {
            return Err(Error::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = self
            .client
            .query("SELECT * FROM users ORDER BY created_at", &[])
            .await?;
        Ok(rows.iter().map(row_to_user).collect())
    }
}
