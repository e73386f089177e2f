use crate::errors::CatalogError;
use crate::models::{HttpMethod, NewPermissionRecord, PageResult, PermissionRecord};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// PermissionCatalog Trait
///
/// Contract for the persisted permission catalog. Records are uniquely keyed by
/// `(path, method)`; a second `create` for an existing key must fail with
/// `CatalogError::Conflict` rather than a generic store failure, so racing
/// synchronizers can tell "someone else won" apart from "the store is down".
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    async fn exists_by_key(&self, path: &str, method: HttpMethod) -> Result<bool, CatalogError>;

    async fn create(&self, record: NewPermissionRecord) -> Result<PermissionRecord, CatalogError>;

    /// Reads `limit` records starting at `offset`, ordered by id, together with the
    /// total catalog size.
    async fn page(&self, offset: i64, limit: i64)
    -> Result<PageResult<PermissionRecord>, CatalogError>;
}

/// CatalogState
///
/// The concrete type used to share catalog access across the application state.
pub type CatalogState = Arc<dyn PermissionCatalog>;

const SELECT_COLUMNS: &str = "id, name, path, method, description, permission_type, roles, status, created_at, updated_at";

/// PostgresCatalog
///
/// `PermissionCatalog` backed by the `api_perms` table. The `UNIQUE (path, method)`
/// constraint in the migration is what makes concurrent creates safe.
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionCatalog for PostgresCatalog {
    async fn exists_by_key(&self, path: &str, method: HttpMethod) -> Result<bool, CatalogError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM api_perms WHERE path = $1 AND method = $2)",
        )
        .bind(path)
        .bind(method.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, record: NewPermissionRecord) -> Result<PermissionRecord, CatalogError> {
        let sql = format!(
            r#"INSERT INTO api_perms (name, path, method, description, permission_type, roles, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {SELECT_COLUMNS}"#
        );

        sqlx::query_as::<_, PermissionRecord>(&sql)
            .bind(&record.name)
            .bind(&record.path)
            .bind(record.method.as_str())
            .bind(&record.description)
            .bind(record.permission_type.as_str())
            .bind(&record.allowed_roles)
            .bind(record.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                // 23505: unique_violation on (path, method).
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    CatalogError::Conflict {
                        path: record.path.clone(),
                        method: record.method,
                    }
                }
                other => other.into(),
            })
    }

    async fn page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<PageResult<PermissionRecord>, CatalogError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM api_perms")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM api_perms ORDER BY id ASC LIMIT $1 OFFSET $2");
        let records = sqlx::query_as::<_, PermissionRecord>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(PageResult { total, records })
    }
}

/// InMemoryCatalog
///
/// A process-local `PermissionCatalog` used by the test suites and by anyone wiring the
/// router without a database. Enforces the same `(path, method)` uniqueness as Postgres.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    next_id: i64,
    records: Vec<PermissionRecord>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog that already holds the given records, assigning ids in order.
    pub fn with_records(records: Vec<NewPermissionRecord>) -> Self {
        let mut state = InMemoryState::default();
        for record in records {
            state.insert(record);
        }
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Snapshot of every stored record, in id order.
    pub async fn records(&self) -> Vec<PermissionRecord> {
        self.inner.lock().await.records.clone()
    }
}

impl InMemoryState {
    fn insert(&mut self, record: NewPermissionRecord) -> PermissionRecord {
        self.next_id += 1;
        let now = Utc::now();
        let stored = PermissionRecord {
            id: self.next_id,
            name: record.name,
            path: record.path,
            method: record.method,
            description: record.description,
            permission_type: record.permission_type,
            allowed_roles: record.allowed_roles,
            status: record.status,
            created_at: now,
            updated_at: now,
        };
        self.records.push(stored.clone());
        stored
    }

    fn contains(&self, path: &str, method: HttpMethod) -> bool {
        self.records
            .iter()
            .any(|r| r.path == path && r.method == method)
    }
}

#[async_trait]
impl PermissionCatalog for InMemoryCatalog {
    async fn exists_by_key(&self, path: &str, method: HttpMethod) -> Result<bool, CatalogError> {
        Ok(self.inner.lock().await.contains(path, method))
    }

    async fn create(&self, record: NewPermissionRecord) -> Result<PermissionRecord, CatalogError> {
        let mut state = self.inner.lock().await;
        if state.contains(&record.path, record.method) {
            return Err(CatalogError::Conflict {
                path: record.path,
                method: record.method,
            });
        }
        Ok(state.insert(record))
    }

    async fn page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<PageResult<PermissionRecord>, CatalogError> {
        let state = self.inner.lock().await;
        let records = state
            .records
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(PageResult {
            total: state.records.len() as i64,
            records,
        })
    }
}
