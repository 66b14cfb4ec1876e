//! In-memory store.
//!
//! Entities live in one table per type, keyed by identifier. Relationships
//! are identifier references between tables; every operation touching more
//! than one table runs under a single write guard.

mod activities;
mod products;
mod semesters;
mod specializations;
mod users;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::AppState;
use crate::clock::Clock;
use crate::id::{
    ActivityId, ProductId, SemesterId, SpecializationId, UserId, WalletId,
};
use crate::model::{
    BlockchainActivity, DomainError, Product, Result, Semester,
    Specialization, User, Wallet,
};

/// Custom db structure to pass to Axum.
#[derive(Clone)]
pub struct Database {
    tables: Arc<RwLock<Tables>>,
    /// Stamps wallet changes.
    clock: Arc<dyn Clock>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    wallets: BTreeMap<WalletId, Wallet>,
    /// Owner index over `wallets`.
    wallet_of: HashMap<UserId, WalletId>,
    specializations: BTreeMap<SpecializationId, Specialization>,
    activities: BTreeMap<ActivityId, BlockchainActivity>,
    semesters: BTreeMap<SemesterId, Semester>,
    products: BTreeMap<ProductId, Product>,
}

impl Database {
    /// Create an empty [`Database`] on the system clock.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(crate::clock::SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::default(),
            clock,
        }
    }
}

impl Tables {
    fn user_mut(&mut self, id: &UserId) -> Result<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    fn wallet_mut(&mut self, owner: &UserId) -> Result<&mut Wallet> {
        self.wallet_of
            .get(owner)
            .and_then(|id| self.wallets.get_mut(id))
            .ok_or_else(|| DomainError::not_found("wallet", owner))
    }

    fn specialization_mut(
        &mut self,
        id: &SpecializationId,
    ) -> Result<&mut Specialization> {
        self.specializations
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("specialization", id))
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Database {
        app_state.db.clone()
    }
}
