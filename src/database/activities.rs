//! Blockchain activities and reward grants.

use crate::database::Database;
use crate::dto::UpdateActivityDto;
use crate::id::{ActivityId, UserId};
use crate::model::{BlockchainActivity, DomainError, Result, Wallet};

impl Database {
    pub async fn insert_activity(
        &self,
        activity: BlockchainActivity,
    ) -> Result<BlockchainActivity> {
        self.tables
            .write()
            .await
            .activities
            .insert(activity.id(), activity.clone());
        Ok(activity)
    }

    /// Activities ordered by name; `active_only` hides inactive ones.
    pub async fn activities(&self, active_only: bool) -> Vec<BlockchainActivity> {
        let mut list = self
            .tables
            .read()
            .await
            .activities
            .values()
            .filter(|a| !active_only || a.is_active())
            .cloned()
            .collect::<Vec<_>>();
        list.sort_by(|a, b| a.name().cmp(b.name()));
        list
    }

    pub async fn activity(&self, id: &ActivityId) -> Result<BlockchainActivity> {
        self.tables
            .read()
            .await
            .activities
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("activity", id))
    }

    pub async fn update_activity(
        &self,
        id: &ActivityId,
        body: &UpdateActivityDto,
    ) -> Result<BlockchainActivity> {
        let mut tables = self.tables.write().await;
        let activity = tables
            .activities
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("activity", id))?;

        activity.apply(body)?;
        Ok(activity.clone())
    }

    pub async fn delete_activity(&self, id: &ActivityId) -> Result<()> {
        self.tables
            .write()
            .await
            .activities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("activity", id))
    }

    /// Credit the reward of an activity into a user's wallet.
    pub async fn grant_reward(
        &self,
        id: &ActivityId,
        user: &UserId,
    ) -> Result<Wallet> {
        let mut tables = self.tables.write().await;

        let activity = tables
            .activities
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("activity", id))?;
        if !tables.users.contains_key(user) {
            return Err(DomainError::not_found("user", user));
        }

        let wallet = tables.wallet_mut(user)?;
        activity.grant(wallet, self.clock.as_ref())?;

        tracing::info!(
            activity_id = %id,
            user_id = %user,
            reward = %activity.reward_amount(),
            "reward granted"
        );
        Ok(wallet.clone())
    }
}
