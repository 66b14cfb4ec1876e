//! Semesters. At most one semester is active at any time.

use crate::database::{Database, Tables};
use crate::dto::SemesterDto;
use crate::id::SemesterId;
use crate::model::{DomainError, Result, Semester};

impl Tables {
    fn deactivate_others(&mut self, keep: &SemesterId) {
        self.semesters
            .values_mut()
            .filter(|s| s.id() != *keep)
            .for_each(|s| s.set_active(false));
    }
}

impl Database {
    /// Insert [`Semester`]. A caller-supplied identifier must be unused.
    pub async fn insert_semester(&self, semester: Semester) -> Result<Semester> {
        let mut tables = self.tables.write().await;

        if tables.semesters.contains_key(&semester.id()) {
            return Err(DomainError::conflict("semester", "id", semester.id()));
        }
        if semester.is_active() {
            tables.deactivate_others(&semester.id());
        }

        tables.semesters.insert(semester.id(), semester.clone());
        Ok(semester)
    }

    /// All semesters, ordered by start date.
    pub async fn semesters(&self) -> Vec<Semester> {
        let mut list = self
            .tables
            .read()
            .await
            .semesters
            .values()
            .cloned()
            .collect::<Vec<_>>();
        list.sort_by_key(|s| s.start_date());
        list
    }

    pub async fn semester(&self, id: &SemesterId) -> Result<Semester> {
        self.tables
            .read()
            .await
            .semesters
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("semester", id))
    }

    /// Currently active semester, if any.
    pub async fn active_semester(&self) -> Option<Semester> {
        self.tables
            .read()
            .await
            .semesters
            .values()
            .find(|s| s.is_active())
            .cloned()
    }

    pub async fn update_semester(
        &self,
        id: &SemesterId,
        body: &SemesterDto,
    ) -> Result<Semester> {
        let mut tables = self.tables.write().await;
        let semester = tables
            .semesters
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("semester", id))?;

        semester.update(body)?;
        let semester = semester.clone();
        if semester.is_active() {
            tables.deactivate_others(id);
        }
        Ok(semester)
    }

    /// Make `id` the only active semester.
    pub async fn activate_semester(&self, id: &SemesterId) -> Result<Semester> {
        let mut tables = self.tables.write().await;
        let semester = tables
            .semesters
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("semester", id))?;

        semester.set_active(true);
        let semester = semester.clone();
        tables.deactivate_others(id);

        tracing::info!(semester_id = %id, "semester activated");
        Ok(semester)
    }

    pub async fn delete_semester(&self, id: &SemesterId) -> Result<()> {
        self.tables
            .write()
            .await
            .semesters
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("semester", id))
    }
}
