//! Domain entities.
//!
//! Entities own their invariants: constructors and mutators validate their
//! input and fail with [`DomainError::Validation`] instead of storing bad
//! data. Two entities are equal when their identifiers are equal.
//! Relationships are held as identifiers only.

mod activity;
pub mod error;
mod product;
mod semester;
mod specialization;
mod user;
mod wallet;

pub use activity::*;
pub use error::{DomainError, Result};
pub use product::*;
pub use semester::*;
pub use specialization::*;
pub use user::*;
pub use wallet::*;

/// Implements identity equality (and hashing) on `id()`.
macro_rules! identity_eq {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    self.id() == other.id()
                }
            }

            impl Eq for $entity {}

            impl std::hash::Hash for $entity {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.id().hash(state);
                }
            }
        )+
    };
}

identity_eq!(
    User,
    Wallet,
    Specialization,
    BlockchainActivity,
    Semester,
    Product,
);
