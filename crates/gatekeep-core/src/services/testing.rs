//! In-crate fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::{TokenClaims, User};
use crate::error::StoreError;
use crate::ports::{
    AuthError, Cache, CacheError, NewUserRow, PasswordService, TokenCodec, UserStore,
};

/// Cache fake that records TTLs and can be told to fail.
#[derive(Default)]
pub struct FakeCache {
    entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), None));
    }
}

#[async_trait]
impl Cache for FakeCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("cache unavailable".to_string()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Operation("cache unavailable".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Operation("cache unavailable".to_string()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Store fake keeping rows in insertion order and counting lookups.
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<Vec<User>>,
    lookups: AtomicUsize,
    fail: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().cloned().map(User::without_password).collect())
    }

    async fn insert(&self, row: NewUserRow) -> Result<User, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == row.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
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
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.email != email);
        Ok((before - rows.len()) as u64)
    }
}

/// Cheap deterministic "hash" so tests don't pay for argon2.
pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("fake${}", password.chars().rev().collect::<String>()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(self.hash(password)? == hash)
    }
}

/// [`FakePasswords`] that counts verifications.
#[derive(Default)]
pub struct CountingPasswords {
    verifies: AtomicUsize,
}

impl CountingPasswords {
    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl PasswordService for CountingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        FakePasswords.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        FakePasswords.verify(password, hash)
    }
}

/// Codec that "signs" by appending a secret to the JSON claims.
pub struct FakeCodec {
    pub lifetime: TimeDelta,
}

impl FakeCodec {
    const SIGNATURE: &'static str = "|signed";

    pub fn new() -> Self {
        Self {
            lifetime: TimeDelta::hours(24),
        }
    }
}

impl TokenCodec for FakeCodec {
    fn issue(&self, email: &str, is_admin: bool, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            issuer: "icm".to_string(),
            email: email.to_string(),
            is_admin,
            issued_at: now,
            expires_at: now + self.lifetime,
        };
        let body = serde_json::to_string(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok(format!("{body}{}", Self::SIGNATURE))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let body = token
            .strip_suffix(Self::SIGNATURE)
            .ok_or_else(|| AuthError::InvalidToken("bad signature".to_string()))?;
        let claims: TokenClaims =
            serde_json::from_str(body).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if now > claims.expires_at {
            return Err(AuthError::InvalidToken("token has expired".to_string()));
        }
        Ok(claims)
    }

    fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }
}
