use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use sqlx::{Decode, FromRow, Postgres, Type};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hiring,
    Operations,
    Mixed,
    CountryManager,
}

#[derive(Debug, Error)]
#[error("unknown role '{0}' (expected one of: hiring, operations, mixed, country_manager)")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Hiring,
        Role::Operations,
        Role::Mixed,
        Role::CountryManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hiring => "hiring",
            Role::Operations => "operations",
            Role::Mixed => "mixed",
            Role::CountryManager => "country_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// Stored as TEXT guarded by a CHECK constraint rather than a Postgres enum.
impl Type<Postgres> for Role {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A user profile. `user_id` is issued by the external auth provider.
/// `role` may be null on rows written outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub role: Option<Role>,
    pub salary: Option<f64>,
    pub schedule: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub role: Role,
    pub salary: Option<f64>,
    pub schedule: Option<String>,
}
