//! Specializations.

use crate::database::Database;
use crate::id::SpecializationId;
use crate::model::{DomainError, Result, Specialization};

impl Database {
    /// Insert [`Specialization`]; major codes are unique.
    pub async fn insert_specialization(
        &self,
        specialization: Specialization,
    ) -> Result<Specialization> {
        let mut tables = self.tables.write().await;

        if tables
            .specializations
            .values()
            .any(|s| s.major_code() == specialization.major_code())
        {
            return Err(DomainError::conflict(
                "specialization",
                "majorCode",
                specialization.major_code(),
            ));
        }

        tables
            .specializations
            .insert(specialization.id(), specialization.clone());
        Ok(specialization)
    }

    /// All specializations, ordered by major code.
    pub async fn specializations(&self) -> Vec<Specialization> {
        let mut list = self
            .tables
            .read()
            .await
            .specializations
            .values()
            .cloned()
            .collect::<Vec<_>>();
        list.sort_by(|a, b| a.major_code().cmp(b.major_code()));
        list
    }

    pub async fn specialization(
        &self,
        id: &SpecializationId,
    ) -> Result<Specialization> {
        self.tables
            .read()
            .await
            .specializations
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("specialization", id))
    }

    /// Delete a specialization. Refused while it still has members.
    pub async fn delete_specialization(
        &self,
        id: &SpecializationId,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;

        let members = tables.specialization_mut(id)?.members().len();
        if members > 0 {
            return Err(DomainError::conflict(
                "specialization",
                "userIds",
                format!("{members} member(s)"),
            ));
        }

        tables.specializations.remove(id);
        Ok(())
    }
}
