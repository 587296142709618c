//! Entity traits: identity + continuity across state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync;

    /// Human-readable kind used in error messages (`"user"`, `"place"`, ...).
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    fn timestamps(&self) -> &Timestamps;
}

/// An entity that can live in a generic repository.
///
/// The repository needs two things beyond identity: a way to apply a typed
/// partial update atomically, and a by-name view of plain attributes for
/// lookups such as "user with this email".
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// Partial update: every field optional, unmentioned fields untouched.
    type Patch: Clone + core::fmt::Debug + Send + Sync;

    /// Apply `patch` to `self`.
    ///
    /// Either every present field is valid and all are written, or an error is
    /// returned and `self` is left exactly as it was.
    fn apply_patch(&mut self, patch: &Self::Patch) -> DomainResult<()>;

    /// Value of a named plain attribute, compared by value in lookups.
    ///
    /// Secrets and unknown names yield `None`.
    fn attribute(&self, name: &str) -> Option<serde_json::Value>;
}

/// Creation and last-modification instants shared by every entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record a mutation. `created_at` never moves.
    pub fn touch(&mut self) {
        let now = Utc::now();
        // Wall clocks can step backwards; keep updated_at monotonic.
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "created_at" => serde_json::to_value(self.created_at).ok(),
            "updated_at" => serde_json::to_value(self.updated_at).ok(),
            _ => None,
        }
    }
}

/// Compare two attribute values the way lookups do.
///
/// Numbers compare by numeric value, so `100` matches `100.0`. Arrays and
/// objects compare element-wise under the same rule.
pub fn same_value(left: &serde_json::Value, right: &serde_json::Value) -> bool {
    use serde_json::Value;

    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => left == right,
    }
}

/// Shared attribute lookup for the base fields (`id`, `created_at`, `updated_at`).
pub fn base_attribute<E: Entity>(entity: &E, name: &str) -> Option<serde_json::Value> {
    match name {
        "id" => Some(serde_json::Value::String(entity.id().to_string())),
        _ => entity.timestamps().attribute(name),
    }
}
