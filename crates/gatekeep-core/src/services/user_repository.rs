//! Read-through cached access to user records.
//!
//! Reads consult `user:<email>` in the cache before the store and populate
//! it on a miss. Cache failures on the read path fall back to the store;
//! failures writing back are logged and ignored. Deletes invalidate the
//! cached entry so a deleted user can never be served from cache.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{NewUser, User, mask_email};
use crate::error::{StoreError, UserError};
use crate::ports::{Cache, NewUserRow, PasswordService, UserStore, user_key};

/// User repository orchestrating the relational store and the cache.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn Cache>,
    passwords: Arc<dyn PasswordService>,
    cache_ttl: Option<Duration>,
}

impl UserRepository {
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn Cache>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            store,
            cache,
            passwords,
            cache_ttl: None,
        }
    }

    /// Expire cached user records after `ttl` instead of keeping them indefinitely.
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Fetch a user, password hash included, by exact email.
    pub async fn fetch(&self, email: &str) -> Result<User, UserError> {
        let key = user_key(email);

        if let Some(user) = self.cached(&key, email).await {
            return Ok(user);
        }

        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        self.write_back(&key, &user).await;
        Ok(user)
    }

    /// Hash the password and insert a new user.
    ///
    /// The cache is left untouched; the first fetch takes the miss path.
    pub async fn create(&self, user: NewUser, password: &str) -> Result<User, UserError> {
        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let row = NewUserRow {
            email: user.email,
            name: user.name,
            password_hash,
        };
        let email = row.email.clone();

        match self.store.insert(row).await {
            Ok(created) => {
                tracing::info!(user_email = %mask_email(&email), "User created");
                Ok(created)
            }
            Err(StoreError::UniqueViolation(_)) => Err(UserError::Duplicate(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// All users in store order, without password hashes.
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(User::without_password).collect())
    }

    /// Delete a user and invalidate its cache entry.
    pub async fn delete(&self, email: &str) -> Result<(), UserError> {
        let affected = self.store.delete_by_email(email).await?;

        // Invalidate even on a store miss.
        self.cache.delete(&user_key(email)).await.inspect_err(|e| {
            tracing::error!(
                user_email = %mask_email(email),
                error = %e,
                "Failed to invalidate cached user after delete"
            );
        })?;

        if affected == 0 {
            return Err(UserError::NotFound(email.to_string()));
        }

        tracing::info!(user_email = %mask_email(email), rows_affected = affected, "User deleted");
        Ok(())
    }

    async fn cached(&self, key: &str, email: &str) -> Option<User> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(user_email = %mask_email(email), "User cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    user_email = %mask_email(email),
                    error = %e,
                    "User cache read failed, falling back to store"
                );
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                tracing::debug!(user_email = %mask_email(email), "User cache hit");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(
                    user_email = %mask_email(email),
                    error = %e,
                    "Discarding undecodable cached user"
                );
                None
            }
        }
    }

    async fn write_back(&self, key: &str, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize user for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &raw, self.cache_ttl).await {
            tracing::warn!(
                user_email = %mask_email(&user.email),
                error = %e,
                "Failed to populate user cache"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeCache, FakePasswords, FakeStore};

    struct Fixture {
        store: Arc<FakeStore>,
        cache: Arc<FakeCache>,
        repo: UserRepository,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(FakeStore::new());
        let cache = Arc::new(FakeCache::new());
        let repo = UserRepository::new(store.clone(), cache.clone(), Arc::new(FakePasswords));
        Fixture { store, cache, repo }
    }

    #[tokio::test]
    async fn test_create_then_fetch_hashes_password() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();

        let user = f.repo.fetch("test@test.com").await.unwrap();

        assert_eq!(user.email, "test@test.com");
        assert_eq!(user.name, "testUser");
        let hash = user.password_hash.unwrap();
        assert_ne!(hash, "P@ssw0rd1");
        assert!(FakePasswords.verify("P@ssw0rd1", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_does_not_populate_cache() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();

        assert!(f.cache.value("user:test@test.com").is_none());
    }

    #[tokio::test]
    async fn test_fetch_cache_miss_populates_cache() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();

        f.repo.fetch("test@test.com").await.unwrap();

        let raw = f.cache.value("user:test@test.com").unwrap();
        let cached: User = serde_json::from_str(&raw).unwrap();
        assert_eq!(cached.email, "test@test.com");
        assert!(cached.password_hash.is_some());
        assert_eq!(f.cache.ttl("user:test@test.com"), Some(None));
    }

    #[tokio::test]
    async fn test_fetch_cache_hit_skips_store() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();

        f.repo.fetch("test@test.com").await.unwrap();
        f.repo.fetch("test@test.com").await.unwrap();

        assert_eq!(f.store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_fetch_ignores_undecodable_cache_entry() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();
        f.cache.insert_raw("user:test@test.com", "{not json");

        let user = f.repo.fetch("test@test.com").await.unwrap();

        assert_eq!(user.name, "testUser");
        assert_eq!(f.store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_fetch_survives_cache_outage() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();
        f.cache.fail_reads(true);
        f.cache.fail_writes(true);

        let user = f.repo.fetch("test@test.com").await.unwrap();
        assert_eq!(user.email, "test@test.com");
    }

    #[tokio::test]
    async fn test_fetch_unknown_is_not_found() {
        let f = fixture();
        let result = f.repo.fetch("nobody@test.com").await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
        assert!(f.cache.value("user:nobody@test.com").is_none());
    }

    #[tokio::test]
    async fn test_fetch_surfaces_store_error() {
        let f = fixture();
        f.store.fail(true);
        let result = f.repo.fetch("test@test.com").await;
        assert!(matches!(result, Err(UserError::Store(_))));
    }

    #[tokio::test]
    async fn test_cache_ttl_is_applied() {
        let f = fixture();
        let repo = f.repo.clone().with_cache_ttl(Some(Duration::from_secs(300)));
        repo.create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();

        repo.fetch("test@test.com").await.unwrap();

        assert_eq!(
            f.cache.ttl("user:test@test.com"),
            Some(Some(Duration::from_secs(300)))
        );
    }

    #[tokio::test]
    async fn test_duplicate_create() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "first"), "P@ssw0rd1")
            .await
            .unwrap();

        let result = f
            .repo
            .create(NewUser::new("test@test.com", "second"), "0therP@ss")
            .await;

        assert!(matches!(result, Err(UserError::Duplicate(ref e)) if e == "test@test.com"));
        let user = f.repo.fetch("test@test.com").await.unwrap();
        assert_eq!(user.name, "first");
        assert!(FakePasswords
            .verify("P@ssw0rd1", user.password_hash.as_deref().unwrap())
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_surfaces_store_outage() {
        let f = fixture();
        f.store.fail(true);

        let result = f
            .repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await;

        assert!(matches!(result, Err(UserError::Store(StoreError::Connection(_)))));
        assert!(f.cache.value("user:test@test.com").is_none());
    }

    #[tokio::test]
    async fn test_list_excludes_passwords() {
        let f = fixture();
        for (email, name) in [("a@test.com", "a"), ("b@test.com", "b"), ("c@test.com", "c")] {
            f.repo
                .create(NewUser::new(email, name), "P@ssw0rd1")
                .await
                .unwrap();
        }

        let users = f.repo.list().await.unwrap();

        let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["a@test.com", "b@test.com", "c@test.com"]);
        assert!(users.iter().all(|u| u.password_hash.is_none()));
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();
        f.repo.fetch("test@test.com").await.unwrap();
        assert!(f.cache.value("user:test@test.com").is_some());

        f.repo.delete("test@test.com").await.unwrap();

        assert!(f.cache.value("user:test@test.com").is_none());
        let result = f.repo.fetch("test@test.com").await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_clears_orphaned_entry() {
        let f = fixture();
        f.cache.insert_raw("user:ghost@test.com", "{}");

        let result = f.repo.delete("ghost@test.com").await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
        assert!(f.cache.value("user:ghost@test.com").is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_failed_invalidation() {
        let f = fixture();
        f.repo
            .create(NewUser::new("test@test.com", "testUser"), "P@ssw0rd1")
            .await
            .unwrap();
        f.cache.fail_writes(true);

        let result = f.repo.delete("test@test.com").await;

        assert!(matches!(result, Err(UserError::Cache(_))));
    }
}
