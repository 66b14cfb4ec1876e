//! Blockchain activity entity: a task students complete to earn rewards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::dto::UpdateActivityDto;
use crate::id::{ActivityId, IdGenerator};
use crate::model::error::{DomainError, Result, required_text};
use crate::model::wallet::Wallet;

const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ActivityRecord")]
pub struct BlockchainActivity {
    id: ActivityId,
    name: String,
    description: String,
    #[serde(with = "rust_decimal::serde::str")]
    reward_amount: Decimal,
    is_active: bool,
}

/// Activity as read back from JSON, before its fields are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    id: ActivityId,
    #[serde(flatten)]
    body: UpdateActivityDto,
}

impl TryFrom<ActivityRecord> for BlockchainActivity {
    type Error = DomainError;

    fn try_from(record: ActivityRecord) -> Result<Self> {
        let mut activity = Self::blank(record.id);
        activity.apply(&record.body)?;
        Ok(activity)
    }
}

impl BlockchainActivity {
    fn blank(id: ActivityId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            reward_amount: Decimal::ZERO,
            is_active: false,
        }
    }

    /// Create a new [`BlockchainActivity`] from its request body.
    pub fn new(ids: &dyn IdGenerator, body: &UpdateActivityDto) -> Result<Self> {
        let mut activity = Self::blank(ActivityId::generate(ids));
        activity.apply(body)?;
        Ok(activity)
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reward_amount(&self) -> Decimal {
        self.reward_amount
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Replaces every editable field. Nothing changes if validation fails.
    pub fn apply(&mut self, body: &UpdateActivityDto) -> Result<()> {
        let name = required_text("name", &body.name, MAX_NAME_LENGTH)?;
        let description = body.description.trim();
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(
                "description",
                format!("must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            ));
        }
        if body.reward_amount < Decimal::ZERO {
            return Err(DomainError::validation(
                "rewardAmount",
                "must not be negative",
            ));
        }

        self.name = name;
        self.description = description.to_owned();
        self.reward_amount = body.reward_amount;
        self.is_active = body.is_active;
        Ok(())
    }

    /// Credits the reward into `wallet`. Inactive activities grant nothing.
    pub fn grant(&self, wallet: &mut Wallet, clock: &dyn Clock) -> Result<Decimal> {
        if !self.is_active {
            return Err(DomainError::validation(
                "isActive",
                "activity is not active",
            ));
        }
        if self.reward_amount.is_zero() {
            return Err(DomainError::validation(
                "rewardAmount",
                "activity has no reward",
            ));
        }
        wallet.credit(self.reward_amount, clock)
    }
}
