use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

// --- Enumerations (Persisted as TEXT) ---

/// ParseEnumError
///
/// Raised when a persisted or user-supplied string does not name a known variant.
/// Used as the `TryFrom<String>` error so sqlx can decode TEXT columns into enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// HttpMethod
///
/// The HTTP verbs a route can be registered with. Stored and serialized upper case,
/// which keeps the `(path, method)` catalog key stable across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// True for the verbs whose endpoints are tracked in the permission catalog.
    pub fn is_catalogued(&self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(ParseEnumError {
                kind: "http method",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// PermissionType
///
/// Access class of a catalogued endpoint. Discovery only ever produces `Public`;
/// the other classes are assigned by administrators afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PermissionType {
    #[default]
    Public,
    Protected,
    Private,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Public => "public",
            PermissionType::Protected => "protected",
            PermissionType::Private => "private",
        }
    }
}

impl TryFrom<String> for PermissionType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "public" => Ok(PermissionType::Public),
            "protected" => Ok(PermissionType::Protected),
            "private" => Ok(PermissionType::Private),
            _ => Err(ParseEnumError {
                kind: "permission type",
                value,
            }),
        }
    }
}

/// PermissionStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PermissionStatus {
    #[default]
    Active,
    Inactive,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Active => "active",
            PermissionStatus::Inactive => "inactive",
        }
    }
}

impl TryFrom<String> for PermissionStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(PermissionStatus::Active),
            "inactive" => Ok(PermissionStatus::Inactive),
            _ => Err(ParseEnumError {
                kind: "permission status",
                value,
            }),
        }
    }
}

// --- Core Schemas ---

/// RouteDescriptor
///
/// Normalized view of one registered endpoint, recomputed on every boot by the
/// introspector. Only lives for the duration of a single synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteDescriptor {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
}

/// PermissionRecord
///
/// A catalogued endpoint from the `api_perms` table, uniquely keyed by `(path, method)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct PermissionRecord {
    pub id: i64,
    pub name: String,
    pub path: String,
    #[sqlx(try_from = "String")]
    pub method: HttpMethod,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub permission_type: PermissionType,

    /// Role codes allowed through. Persisted in the `roles` TEXT[] column.
    #[sqlx(rename = "roles")]
    #[serde(rename = "roles")]
    pub allowed_roles: Vec<String>,

    #[sqlx(try_from = "String")]
    pub status: PermissionStatus,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Role code every newly discovered endpoint is opened to.
pub const DEFAULT_ROLE: &str = "default";

/// NewPermissionRecord
///
/// Insert payload for the catalog. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermissionRecord {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub permission_type: PermissionType,
    pub allowed_roles: Vec<String>,
    pub status: PermissionStatus,
}

impl NewPermissionRecord {
    /// Seeds the defaults applied to every endpoint seen for the first time:
    /// public, open to the `default` role, active.
    pub fn discovered(descriptor: &RouteDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            path: descriptor.path.clone(),
            method: descriptor.method,
            description: descriptor.description.clone(),
            permission_type: PermissionType::Public,
            allowed_roles: vec![DEFAULT_ROLE.to_string()],
            status: PermissionStatus::Active,
        }
    }
}

// --- Paging & Response Envelope ---

/// PageQuery
///
/// Query parameters accepted by paginated listing endpoints. Missing values fall back
/// to page 1 of 10.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: i64,
    /// Records per page, between 1 and 100.
    pub page_size: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// Checks bounds and converts to an `(offset, limit)` pair.
    pub fn to_offset_limit(&self) -> Result<(i64, i64), String> {
        if self.page < 1 {
            return Err(format!("page must be at least 1, got {}", self.page));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            ));
        }
        let offset = (self.page - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| format!("page {} is out of range", self.page))?;
        Ok((offset, self.page_size))
    }
}

/// PageResult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageResult<T> {
    pub total: i64,
    pub records: Vec<T>,
}

/// ApiResponse
///
/// The uniform envelope every JSON endpoint answers with. `code` mirrors the HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}
