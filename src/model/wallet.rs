//! Wallet entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::id::{IdGenerator, UserId, WalletId};
use crate::model::error::{DomainError, Result};

/// Reward balance of exactly one user. The balance is never negative.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WalletRecord")]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
    updated_at: DateTime<Utc>,
}

/// Wallet as read back from JSON, before its balance is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletRecord {
    id: WalletId,
    user_id: UserId,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WalletRecord> for Wallet {
    type Error = DomainError;

    fn try_from(record: WalletRecord) -> Result<Self> {
        if record.balance < Decimal::ZERO {
            return Err(DomainError::validation("balance", "must not be negative"));
        }

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            balance: record.balance,
            updated_at: record.updated_at,
        })
    }
}

impl Wallet {
    /// Opens an empty wallet for `user_id`.
    pub fn open(ids: &dyn IdGenerator, clock: &dyn Clock, user_id: UserId) -> Self {
        Self {
            id: WalletId::generate(ids),
            user_id,
            balance: Decimal::ZERO,
            updated_at: clock.now(),
        }
    }

    pub fn id(&self) -> WalletId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds `amount` to the balance.
    ///
    /// A sum past the representable range fails and leaves the wallet as is.
    pub fn credit(&mut self, amount: Decimal, clock: &dyn Clock) -> Result<Decimal> {
        positive(amount)?;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            DomainError::validation("balance", "balance would overflow")
        })?;
        self.updated_at = clock.now();
        Ok(self.balance)
    }

    /// Withdraws `amount`; the balance never goes below zero.
    pub fn debit(&mut self, amount: Decimal, clock: &dyn Clock) -> Result<Decimal> {
        positive(amount)?;
        let balance = self
            .balance
            .checked_sub(amount)
            .filter(|balance| *balance >= Decimal::ZERO)
            .ok_or_else(|| {
                DomainError::validation(
                    "balance",
                    format!("insufficient balance: {} < {amount}", self.balance),
                )
            })?;
        self.balance = balance;
        self.updated_at = clock.now();
        Ok(self.balance)
    }
}

fn positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation("amount", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::clock::{FixedClock, SystemClock};
    use crate::id::SequentialIds;

    fn wallet() -> Wallet {
        let ids = SequentialIds::new();
        let owner = UserId::generate(&ids);
        Wallet::open(&ids, &SystemClock, owner)
    }

    #[test]
    fn test_open_is_empty() {
        let wallet = wallet();
        assert_eq!(wallet.balance(), Decimal::ZERO);
        assert_ne!(wallet.id().as_uuid(), wallet.user_id().as_uuid());
    }

    #[test]
    fn test_credit_then_debit() {
        let mut wallet = wallet();
        assert_eq!(
            wallet.credit(Decimal::new(1250, 2), &SystemClock).unwrap(),
            Decimal::new(1250, 2)
        );
        assert_eq!(
            wallet.debit(Decimal::new(250, 2), &SystemClock).unwrap(),
            Decimal::new(10, 0)
        );
    }

    #[test]
    fn test_timestamps_follow_the_clock() {
        let ids = SequentialIds::new();
        let opened = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let credited = Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap();

        let mut wallet =
            Wallet::open(&ids, &FixedClock::new(opened), UserId::generate(&ids));
        assert_eq!(wallet.updated_at(), opened);

        wallet.credit(Decimal::ONE, &FixedClock::new(credited)).unwrap();
        assert_eq!(wallet.updated_at(), credited);

        assert!(wallet.debit(Decimal::TEN, &SystemClock).is_err());
        assert_eq!(wallet.updated_at(), credited);
    }

    #[test]
    fn test_rejects_overdraft_and_non_positive() {
        let mut wallet = wallet();
        wallet.credit(Decimal::ONE, &SystemClock).unwrap();

        assert!(matches!(
            wallet.debit(Decimal::TWO, &SystemClock),
            Err(DomainError::Validation { field: "balance", .. })
        ));
        assert!(wallet.credit(Decimal::ZERO, &SystemClock).is_err());
        assert!(wallet.debit(Decimal::NEGATIVE_ONE, &SystemClock).is_err());
        assert_eq!(wallet.balance(), Decimal::ONE);
    }

    #[test]
    fn test_credit_overflow_keeps_balance() {
        let mut wallet = wallet();
        wallet.credit(Decimal::MAX, &SystemClock).unwrap();

        assert!(matches!(
            wallet.credit(Decimal::ONE, &SystemClock),
            Err(DomainError::Validation { field: "balance", .. })
        ));
        assert_eq!(wallet.balance(), Decimal::MAX);

        assert_eq!(
            wallet.debit(Decimal::MAX, &SystemClock).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_large_scale_amounts() {
        let mut wallet = wallet();
        let tiny = Decimal::new(1, 28);

        wallet.credit(tiny, &SystemClock).unwrap();
        wallet.credit(Decimal::new(5, 1), &SystemClock).unwrap();
        assert_eq!(
            wallet.debit(Decimal::new(5, 1), &SystemClock).unwrap(),
            tiny
        );
        assert!(wallet.debit(Decimal::new(2, 28), &SystemClock).is_err());
        assert_eq!(wallet.balance(), tiny);
    }

    #[test]
    fn test_balance_is_a_string_on_the_wire() {
        let mut wallet = wallet();
        wallet.credit(Decimal::new(1050, 2), &SystemClock).unwrap();

        let json = serde_json::to_value(&wallet).unwrap();
        assert_eq!(json["balance"], "10.50");

        let back: Wallet = serde_json::from_value(json).unwrap();
        assert_eq!(back.balance(), Decimal::new(1050, 2));
        assert_eq!(back.user_id(), wallet.user_id());
    }

    #[test]
    fn test_negative_balance_is_not_deserialized() {
        let mut json = serde_json::to_value(wallet()).unwrap();
        json["balance"] = json!("-5");

        assert!(serde_json::from_value::<Wallet>(json).is_err());
    }
}
