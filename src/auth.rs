//! Session issuance: joins a user and its wallet into an [`AuthResponse`].

use std::sync::Arc;

use chrono::TimeDelta;

use crate::clock::Clock;
use crate::crypto::session_token;
use crate::dto::AuthResponse;
use crate::model::{DomainError, Result, User, Wallet};

/// Issues opaque session tokens with a fixed lifetime.
#[derive(Clone)]
pub struct SessionIssuer {
    clock: Arc<dyn Clock>,
    lifetime: TimeDelta,
}

impl SessionIssuer {
    /// Create a new [`SessionIssuer`]; `lifetime_secs` is clamped into the
    /// range chrono can represent.
    pub fn new(clock: Arc<dyn Clock>, lifetime_secs: u64) -> Self {
        let secs = i64::try_from(lifetime_secs).unwrap_or(i64::MAX);
        let lifetime = TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX);

        Self { clock, lifetime }
    }

    /// Build the response sent after a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] when `wallet` is absent, and
    /// [`DomainError::Validation`] when the wallet belongs to someone else or
    /// the expiration would not land strictly after the issuance time.
    pub fn issue(&self, user: User, wallet: Option<Wallet>) -> Result<AuthResponse> {
        let wallet = wallet.ok_or_else(|| DomainError::not_found("wallet", user.id()))?;
        if wallet.user_id() != user.id() {
            return Err(DomainError::validation(
                "wallet",
                "wallet belongs to another user",
            ));
        }

        let issued_at = self.clock.now();
        let expiration = issued_at
            .checked_add_signed(self.lifetime)
            .filter(|expiration| *expiration > issued_at)
            .ok_or_else(|| {
                DomainError::validation("expiration", "must be in the future")
            })?;

        tracing::debug!(user_id = %user.id(), %expiration, "session issued");

        Ok(AuthResponse {
            token: session_token(),
            expiration,
            user,
            wallet,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::{FixedClock, SystemClock};
    use crate::id::{SequentialIds, UserId};
    use crate::model::Role;

    fn issuer(lifetime: u64) -> SessionIssuer {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        SessionIssuer::new(Arc::new(FixedClock::new(now)), lifetime)
    }

    fn student(ids: &SequentialIds) -> User {
        User::new(ids, &SystemClock, "ada@school.edu", "Ada", Role::Student, "$argon2id$x".into()).unwrap()
    }

    #[test]
    fn test_issue() {
        let ids = SequentialIds::new();
        let user = student(&ids);
        let wallet = Wallet::open(&ids, &SystemClock, user.id());

        let response = issuer(900).issue(user.clone(), Some(wallet.clone())).unwrap();

        assert_eq!(response.user, user);
        assert_eq!(response.wallet, wallet);
        assert_eq!(
            response.expiration,
            Utc.with_ymd_and_hms(2024, 9, 1, 8, 15, 0).unwrap()
        );
        assert_eq!(response.token.len(), 64);
    }

    #[test]
    fn test_missing_wallet_is_not_found() {
        let ids = SequentialIds::new();
        let user = student(&ids);
        let id = user.id();

        assert_eq!(
            issuer(900).issue(user, None).unwrap_err(),
            DomainError::not_found("wallet", id)
        );
    }

    #[test]
    fn test_foreign_wallet_is_rejected() {
        let ids = SequentialIds::new();
        let user = student(&ids);
        let wallet = Wallet::open(&ids, &SystemClock, UserId::generate(&ids));

        assert!(matches!(
            issuer(900).issue(user, Some(wallet)),
            Err(DomainError::Validation { field: "wallet", .. })
        ));
    }

    #[test]
    fn test_zero_lifetime_is_rejected() {
        let ids = SequentialIds::new();
        let user = student(&ids);
        let wallet = Wallet::open(&ids, &SystemClock, user.id());

        assert!(matches!(
            issuer(0).issue(user, Some(wallet)),
            Err(DomainError::Validation { field: "expiration", .. })
        ));
    }

    #[test]
    fn test_tokens_differ() {
        let ids = SequentialIds::new();
        let user = student(&ids);
        let wallet = Wallet::open(&ids, &SystemClock, user.id());
        let issuer = issuer(60);

        let a = issuer.issue(user.clone(), Some(wallet.clone())).unwrap();
        let b = issuer.issue(user, Some(wallet)).unwrap();
        assert_ne!(a.token, b.token);
    }
}
