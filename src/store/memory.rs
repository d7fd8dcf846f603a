//! In-memory user store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserStore;
use crate::auth::models::User;
use crate::error::{Error, Result};

/// In-process user storage, keyed by user id
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == identifier || u.username == identifier)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(Error::UserAlreadyExists(user.username));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn set_verified(&self, username: &str) -> Result<()> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.is_verified = true;
                Ok(())
            }
            None => Err(Error::UserNotFound(username.to_string())),
        }
    }

    async fn set_accepting_messages(&self, user_id: &str, accepting: bool) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                user.is_accepting_messages = accepting;
                Ok(())
            }
            None => Err(Error::UserNotFound(user_id.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}
