//! Caller capabilities.
//!
//! Access control is two-level: a single administrator, and a set of
//! addresses granted pool permission on the ledger. Privileged entry points
//! check [`Authorizer::is_authorized_caller`] before touching state.

use std::collections::HashSet;

use alloy_primitives::Address;
use tracing::warn;

use crate::error::OniError;

/// Capability check for privileged entry points
pub trait Authorizer {
    fn is_authorized_caller(&self, caller: Address) -> bool;

    /// Fails with [`OniError::Unauthorized`] unless `caller` holds the capability
    fn ensure_authorized(&self, caller: Address) -> Result<(), OniError> {
        if self.is_authorized_caller(caller) {
            Ok(())
        } else {
            warn!(%caller, "rejected unauthorized caller");
            Err(OniError::Unauthorized { caller })
        }
    }
}

/// The administrator identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admin(pub Address);

impl Authorizer for Admin {
    fn is_authorized_caller(&self, caller: Address) -> bool {
        caller == self.0
    }
}

/// Addresses allowed to move liquidity in and out of debt on the ledger.
///
/// Revoking a pool stops new lending only. A revoked pool keeps the right to
/// settle, which covers booking interest and taking repayments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolPermissions {
    granted: HashSet<Address>,
    revoked: HashSet<Address>,
}

impl PoolPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pool: Address, allowed: bool) {
        if allowed {
            self.granted.insert(pool);
            self.revoked.remove(&pool);
        } else if self.granted.remove(&pool) {
            self.revoked.insert(pool);
        }
    }

    /// Granted now or at some point in the past
    pub fn can_settle(&self, caller: Address) -> bool {
        self.granted.contains(&caller) || self.revoked.contains(&caller)
    }

    pub fn ensure_can_settle(&self, caller: Address) -> Result<(), OniError> {
        if self.can_settle(caller) {
            Ok(())
        } else {
            warn!(%caller, "rejected settlement from unknown pool");
            Err(OniError::Unauthorized { caller })
        }
    }
}

impl Authorizer for PoolPermissions {
    fn is_authorized_caller(&self, caller: Address) -> bool {
        self.granted.contains(&caller)
    }
}
