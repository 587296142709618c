//! User entity.
//!
//! # Invariants
//! - `first_name` / `last_name`: 1–50 characters, not blank.
//! - `email`: `local@domain.tld`, at most 120 characters, stored trimmed.
//!   Uniqueness compares [`email_key`], so case does not matter.
//! - The password exists only as a one-way hash and is never readable.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use lodgebase_core::entity::base_attribute;
use lodgebase_core::{DomainError, DomainResult, Entity, Record, Timestamps, UserId, validate};

use crate::password::PasswordHash;

pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 120;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Comparison key for emails: trimmed and lowercased.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_name(field: &str, value: &str) -> DomainResult<String> {
    validate::text(field, value, NAME_MAX_LEN)
}

fn validate_email(value: &str) -> DomainResult<String> {
    let email = validate::text("email", value, EMAIL_MAX_LEN)?;
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(DomainError::validation(
            "email",
            "must look like local@domain.tld",
        ));
    }
    Ok(email)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Input for creating a user. `password` is plaintext and is hashed on intake.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl core::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    /// Hash the new password, if any, so the patch can be applied without
    /// further expensive work.
    pub fn prepare(&self) -> DomainResult<UserUpdate> {
        let password = self.password.as_deref().map(PasswordHash::new).transpose()?;
        Ok(UserUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password,
            is_admin: self.is_admin,
        })
    }
}

impl core::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserPatch")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// A [`UserPatch`] whose password has already been hashed.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<PasswordHash>,
    pub is_admin: Option<bool>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    password: PasswordHash,
    is_admin: bool,
    timestamps: Timestamps,
}

impl User {
    /// Validate every field and hash the password; nothing is built on failure.
    pub fn new(input: NewUser) -> DomainResult<Self> {
        let first_name = validate_name("first_name", &input.first_name)?;
        let last_name = validate_name("last_name", &input.last_name)?;
        let email = validate_email(&input.email)?;
        let password = PasswordHash::new(&input.password)?;

        Ok(Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            password,
            is_admin: input.is_admin,
            timestamps: Timestamps::now(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// The password is write-only.
    pub fn password(&self) -> DomainResult<&str> {
        Err(DomainError::SecretField("password"))
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        self.password.verify(candidate)
    }

    pub fn set_first_name(&mut self, value: &str) -> DomainResult<()> {
        self.first_name = validate_name("first_name", value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_last_name(&mut self, value: &str) -> DomainResult<()> {
        self.last_name = validate_name("last_name", value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_email(&mut self, value: &str) -> DomainResult<()> {
        self.email = validate_email(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_password(&mut self, plaintext: &str) -> DomainResult<()> {
        self.set_password_hash(PasswordHash::new(plaintext)?);
        Ok(())
    }

    pub fn set_password_hash(&mut self, hash: PasswordHash) {
        self.password = hash;
        self.timestamps.touch();
    }

    pub fn set_is_admin(&mut self, value: bool) {
        self.is_admin = value;
        self.timestamps.touch();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Canonical view; never includes the password hash.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "user";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Record for User {
    type Patch = UserUpdate;

    fn apply_patch(&mut self, patch: &UserUpdate) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(value) = &patch.first_name {
            next.set_first_name(value)?;
        }
        if let Some(value) = &patch.last_name {
            next.set_last_name(value)?;
        }
        if let Some(value) = &patch.email {
            next.set_email(value)?;
        }
        if let Some(hash) = &patch.password {
            next.set_password_hash(hash.clone());
        }
        if let Some(value) = patch.is_admin {
            next.set_is_admin(value);
        }
        *self = next;
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "first_name" => Some(self.first_name.clone().into()),
            "last_name" => Some(self.last_name.clone().into()),
            "email" => Some(self.email.clone().into()),
            "email_key" => Some(email_key(&self.email).into()),
            "is_admin" => Some(self.is_admin.into()),
            "password" => None,
            _ => base_attribute(self, name),
        }
    }
}

/// Canonical, secret-free view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
