//! Identifier management.
//!
//! Every entity is keyed by a typed UUID. Fresh identifiers always come
//! from an [`IdGenerator`] handed in by the caller, so tests can swap the
//! random source for a deterministic one.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Port for producing new unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier never handed out before.
    fn generate(&self) -> Uuid;
}

/// Random UUID v4 generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator counting up from `1`.
#[derive(Debug, Default)]
pub struct SequentialIds(AtomicU64);

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> Uuid {
        let next = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(next))
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Draws a fresh identifier from `ids`.
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.generate())
            }

            /// Keeps a supplied identifier, or generates one when it is
            /// absent or nil.
            pub fn or_generate(id: Option<Self>, ids: &dyn IdGenerator) -> Self {
                match id {
                    Some(id) if !id.0.is_nil() => id,
                    _ => Self::generate(ids),
                }
            }

            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            #[inline]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::model::User`].
    UserId
);
entity_id!(
    /// Identifier of a [`crate::model::Wallet`].
    WalletId
);
entity_id!(
    /// Identifier of a [`crate::model::Specialization`].
    SpecializationId
);
entity_id!(
    /// Identifier of a [`crate::model::BlockchainActivity`].
    ActivityId
);
entity_id!(
    /// Identifier of a [`crate::model::Semester`].
    SemesterId
);
entity_id!(
    /// Identifier of a [`crate::model::Product`].
    ProductId
);
