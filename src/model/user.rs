//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::id::{IdGenerator, SpecializationId, UserId};
use crate::model::error::{DomainError, Result, required_text};

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 100;

/// Account kind.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    #[default]
    Student,
}

/// Identity record.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    id: UserId,
    email: String,
    full_name: String,
    role: Role,
    specialization_id: Option<SpecializationId>,
    #[serde(skip)]
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Public view of a user as read back from JSON. It never carries a
/// password hash.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: UserId,
    email: String,
    full_name: String,
    role: Role,
    #[serde(default)]
    specialization_id: Option<SpecializationId>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = DomainError;

    fn try_from(record: UserRecord) -> Result<Self> {
        Ok(Self {
            id: record.id,
            email: normalize_email(&record.email)?,
            full_name: required_text("fullName", &record.full_name, MAX_NAME_LENGTH)?,
            role: record.role,
            specialization_id: record.specialization_id,
            password_hash: String::new(),
            created_at: record.created_at,
        })
    }
}

impl User {
    /// Create a new [`User`] with a freshly generated identifier.
    ///
    /// `password_hash` must already be a PHC string; plaintext passwords
    /// never reach this type.
    pub fn new(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        email: &str,
        full_name: &str,
        role: Role,
        password_hash: String,
    ) -> Result<Self> {
        Ok(Self {
            id: UserId::generate(ids),
            email: normalize_email(email)?,
            full_name: required_text("fullName", full_name, MAX_NAME_LENGTH)?,
            role,
            specialization_id: None,
            password_hash,
            created_at: clock.now(),
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn specialization_id(&self) -> Option<SpecializationId> {
        self.specialization_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Moves the user to another specialization, or out of any.
    ///
    /// Membership bookkeeping on the specialization side is handled by the
    /// store.
    pub fn assign_specialization(
        &mut self,
        specialization: Option<SpecializationId>,
    ) {
        self.specialization_id = specialization;
    }
}

/// Lowercases and checks an email address shape (`local@domain`).
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        },
        None => false,
    };

    if !valid || email.len() > MAX_EMAIL_LENGTH {
        return Err(DomainError::validation("email", "invalid email address"));
    }
    Ok(email)
}
