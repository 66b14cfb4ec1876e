//! Users and their wallets.

use crate::database::Database;
use crate::id::{IdGenerator, SpecializationId, UserId};
use crate::model::{DomainError, Result, User, Wallet};

impl Database {
    /// Insert [`User`] and open its wallet in the same step.
    ///
    /// Emails are unique; a duplicate fails with [`DomainError::Conflict`].
    pub async fn insert_user(
        &self,
        ids: &dyn IdGenerator,
        user: User,
    ) -> Result<(User, Wallet)> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::conflict("user", "email", user.email()));
        }
        if let Some(spec) = user.specialization_id() {
            tables.specialization_mut(&spec)?.enroll(user.id());
        }

        let wallet = Wallet::open(ids, self.clock.as_ref(), user.id());
        tables.wallet_of.insert(user.id(), wallet.id());
        tables.wallets.insert(wallet.id(), wallet.clone());
        tables.users.insert(user.id(), user.clone());

        tracing::debug!(user_id = %user.id(), wallet_id = %wallet.id(), "user inserted");
        Ok((user, wallet))
    }

    /// All users, ordered by identifier.
    pub async fn users(&self) -> Vec<User> {
        self.tables.read().await.users.values().cloned().collect()
    }

    /// Find user using its identifier.
    pub async fn user(&self, id: &UserId) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Find user using its (normalized) email.
    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email() == email)
            .cloned()
    }

    /// Wallet owned by `owner`, if any.
    pub async fn wallet_of(&self, owner: &UserId) -> Option<Wallet> {
        let tables = self.tables.read().await;
        tables
            .wallet_of
            .get(owner)
            .and_then(|id| tables.wallets.get(id))
            .cloned()
    }

    /// Delete user, its wallet, and its specialization membership.
    pub async fn delete_user(&self, id: &UserId) -> Result<User> {
        let mut tables = self.tables.write().await;

        let user = tables
            .users
            .remove(id)
            .ok_or_else(|| DomainError::not_found("user", id))?;
        if let Some(wallet) = tables.wallet_of.remove(id) {
            tables.wallets.remove(&wallet);
        }
        if let Some(spec) = user.specialization_id() {
            if let Some(spec) = tables.specializations.get_mut(&spec) {
                spec.withdraw(id);
            }
        }

        tracing::debug!(user_id = %id, "user deleted");
        Ok(user)
    }

    /// Move a user into `specialization`, or out of any when `None`.
    pub async fn assign_specialization(
        &self,
        id: &UserId,
        specialization: Option<SpecializationId>,
    ) -> Result<User> {
        let mut tables = self.tables.write().await;

        if let Some(new) = specialization {
            if !tables.specializations.contains_key(&new) {
                return Err(DomainError::not_found("specialization", new));
            }
        }

        let previous = tables.user_mut(id)?.specialization_id();
        if let Some(old) = previous {
            if let Some(old) = tables.specializations.get_mut(&old) {
                old.withdraw(id);
            }
        }
        if let Some(new) = specialization {
            tables.specialization_mut(&new)?.enroll(*id);
        }

        let user = tables.user_mut(id)?;
        user.assign_specialization(specialization);
        Ok(user.clone())
    }
}
