//! PostgreSQL user store via SeaORM.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use gatekeep_core::StoreError;
use gatekeep_core::domain::{User, mask_email};
use gatekeep_core::ports::{NewUserRow, UserStore};

use super::entity::user::{self, Entity as UserEntity};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// User store backed by the `users` table.
///
/// Every statement is parameterized by SeaORM and bounded by the query
/// timeout; mutations run in their own transaction which is rolled back
/// before an error is returned.
pub struct SeaOrmUserStore {
    db: DbConn,
    query_timeout: Duration,
}

impl SeaOrmUserStore {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Run a database call under the query timeout.
    pub(super) async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(map_db_err),
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "User store query timed out"
                );
                Err(StoreError::Connection(format!(
                    "query timed out after {}ms",
                    self.query_timeout.as_millis()
                )))
            }
        }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, StoreError> {
        self.bounded(self.db.begin()).await
    }

    /// Commit on success, roll back on failure.
    async fn finish<T>(
        &self,
        txn: DatabaseTransaction,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                self.bounded(txn.commit()).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.bounded(txn.rollback()).await {
                    tracing::error!(error = %rollback_err, "Error while rolling back transaction");
                }
                Err(e)
            }
        }
    }
}

fn map_db_err(e: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return StoreError::UniqueViolation(detail);
    }
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Connection(e.to_string()),
        other => {
            let err_str = other.to_string();
            if err_str.contains("duplicate key") {
                StoreError::UniqueViolation(err_str)
            } else {
                StoreError::Query(err_str)
            }
        }
    }
}

#[async_trait]
impl UserStore for SeaOrmUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = self
            .bounded(
                UserEntity::find()
                    .filter(user::Column::Email.eq(email))
                    .one(&self.db),
            )
            .await?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let query = UserEntity::find()
            .select_only()
            .columns([
                user::Column::Id,
                user::Column::Email,
                user::Column::Name,
                user::Column::CreatedAt,
            ])
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .into_model::<user::Summary>()
            .all(&self.db);
        let rows = self.bounded(query).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, row: NewUserRow) -> Result<User, StoreError> {
        let active: user::ActiveModel = row.into();

        let txn = self.begin().await?;
        let result = self.bounded(active.insert(&txn)).await;
        let model = self.finish(txn, result).await?;

        Ok(model.into())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let txn = self.begin().await?;
        let result = self
            .bounded(
                UserEntity::delete_many()
                    .filter(user::Column::Email.eq(email))
                    .exec(&txn),
            )
            .await
            .map(|r| r.rows_affected);

        self.finish(txn, result).await
    }
}
