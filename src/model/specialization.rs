//! Specialization (academic major) entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::{IdGenerator, SpecializationId, UserId};
use crate::model::error::{DomainError, Result, required_text};

const MAX_CODE_LENGTH: usize = 16;
const MAX_NAME_LENGTH: usize = 100;

/// Academic track. Holds its members by identifier only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SpecializationRecord")]
pub struct Specialization {
    id: SpecializationId,
    major_code: String,
    name: String,
    #[serde(default)]
    user_ids: BTreeSet<UserId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpecializationRecord {
    id: SpecializationId,
    major_code: String,
    name: String,
    #[serde(default)]
    user_ids: BTreeSet<UserId>,
}

impl TryFrom<SpecializationRecord> for Specialization {
    type Error = DomainError;

    fn try_from(record: SpecializationRecord) -> Result<Self> {
        Ok(Self {
            id: record.id,
            major_code: normalize_major_code(&record.major_code)?,
            name: required_text("name", &record.name, MAX_NAME_LENGTH)?,
            user_ids: record.user_ids,
        })
    }
}

impl Specialization {
    /// Create a new [`Specialization`].
    ///
    /// `major_code` is trimmed and uppercased; it must be ASCII alphanumeric
    /// (dashes allowed) and at most 16 characters.
    pub fn new(
        ids: &dyn IdGenerator,
        major_code: &str,
        name: &str,
    ) -> Result<Self> {
        Ok(Self {
            id: SpecializationId::generate(ids),
            major_code: normalize_major_code(major_code)?,
            name: required_text("name", name, MAX_NAME_LENGTH)?,
            user_ids: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> SpecializationId {
        self.id
    }

    pub fn major_code(&self) -> &str {
        &self.major_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<UserId> {
        &self.user_ids
    }

    /// Returns `true` if the user was not yet a member.
    pub fn enroll(&mut self, user: UserId) -> bool {
        self.user_ids.insert(user)
    }

    /// Returns `true` if the user was a member.
    pub fn withdraw(&mut self, user: &UserId) -> bool {
        self.user_ids.remove(user)
    }
}

/// Canonical form of a major code, used as the uniqueness key.
pub fn normalize_major_code(code: &str) -> Result<String> {
    let code = required_text("majorCode", code, MAX_CODE_LENGTH)?
        .to_ascii_uppercase();

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(DomainError::validation(
            "majorCode",
            "must only contain letters, digits or dashes",
        ));
    }
    Ok(code)
}
