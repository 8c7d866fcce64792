//! In-memory user store for running without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use gatekeep_core::StoreError;
use gatekeep_core::domain::User;
use gatekeep_core::ports::{NewUserRow, UserStore};

/// User store keeping rows in insertion order.
///
/// Each mutation holds the write lock for its whole duration, which gives
/// the same all-or-nothing visibility as a transaction.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    rows: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().cloned().map(User::without_password).collect())
    }

    async fn insert(&self, row: NewUserRow) -> Result<User, StoreError> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|u| u.email == row.email) {
            return Err(StoreError::UniqueViolation(format!(
                "email already registered: {}",
                row.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: row.email,
            name: row.name,
            password_hash: Some(row.password_hash),
            created_at: Utc::now(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|u| u.email != email);
        Ok((before - rows.len()) as u64)
    }
}
