//! Native-asset borrow helper.
//!
//! [`CollateralHelper`] lets an account holding only the native asset open a
//! loan in one call: the attached value is wrapped into the collateral token,
//! posted by the helper, and the borrowed base asset is delivered to the
//! caller, who owns the resulting position.

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::context::CallContext;
use crate::error::OniError;
use crate::oracle::PriceOracle;
use crate::protocol::ProtocolState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralHelper {
    address: Address,
    wrapped_native: Address,
}

impl CollateralHelper {
    /// `wrapped_native` must be the pool's collateral token.
    pub fn new(address: Address, wrapped_native: Address) -> Self {
        Self {
            address,
            wrapped_native,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Wraps `value` native units sent by the caller and borrows
    /// `borrow_amount` against them on the caller's behalf.
    ///
    /// Returns the base amount delivered to the caller.
    pub fn borrow(
        &self,
        state: &mut ProtocolState,
        oracle: &dyn PriceOracle,
        ctx: &CallContext,
        value: U256,
        borrow_amount: U256,
    ) -> Result<U256, OniError> {
        let pool_address = state.pool.address();

        state.tokens.transfer_native(ctx.sender, self.address, value)?;
        state.tokens.wrap_native(self.wrapped_native, self.address, value)?;
        state
            .tokens
            .approve(self.wrapped_native, self.address, pool_address, value)?;

        let received = state.pool.borrow(
            &mut state.ledger,
            &mut state.tokens,
            oracle,
            &CallContext::new(self.address, ctx.timestamp),
            ctx.sender,
            value,
            borrow_amount,
        )?;

        info!(caller = %ctx.sender, %value, %borrow_amount, %received, "helper borrow");
        Ok(received)
    }
}
