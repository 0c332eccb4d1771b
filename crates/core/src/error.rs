//! Error types for the lending core.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors returned by ledger, pool and collaborator operations.
///
/// Every variant aborts the operation that produced it; the protocol state is
/// left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OniError {
    /// Withdrawal or borrow exceeds the idle base asset held by the ledger
    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: U256, available: U256 },

    /// Post-operation debt would exceed the risk-adjusted collateral value
    #[error("Insufficient collateral for account {account}: debt {debt} exceeds max borrow {max_borrow}")]
    InsufficientCollateral {
        account: Address,
        debt: U256,
        max_borrow: U256,
    },

    /// Repayment larger than the account's outstanding debt
    #[error("Repay of {amount} exceeds debt {debt} for account {account}")]
    RepayExceedsDebt {
        account: Address,
        amount: U256,
        debt: U256,
    },

    /// Caller lacks the capability required by a privileged entry point
    #[error("Unauthorized caller {caller}")]
    Unauthorized { caller: Address },

    /// Configuration or curve parameters out of bounds
    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    /// Token transfer rejected because the sender's balance is too low
    #[error("Transfer of {amount} from {from} failed on token {token}: balance is {balance}")]
    TransferFailed {
        token: Address,
        from: Address,
        amount: U256,
        balance: U256,
    },

    /// `transfer_from` exceeds the spender's allowance
    #[error("Insufficient allowance on token {token}: {spender} may spend {allowance} of {owner}, needs {needed}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        allowance: U256,
        needed: U256,
    },

    /// Oracle has no price, or a zero price, for the asset
    #[error("Oracle price invalid for asset {asset}")]
    OraclePriceInvalid { asset: Address },

    /// Claim-token burn larger than the holder's balance
    #[error("Burn of {requested} exceeds claim balance {balance} of {account}")]
    InsufficientClaimBalance {
        account: Address,
        requested: U256,
        balance: U256,
    },

    /// Collateral withdrawal larger than the posted collateral
    #[error("Insufficient position for account {account}: requested {requested}, posted {posted}")]
    InsufficientPosition {
        account: Address,
        requested: U256,
        posted: U256,
    },

    /// Interest accrual was attempted with a timestamp before the last update
    #[error("Invalid interest accrual: timestamp {timestamp} is before last update {last_update}")]
    InvalidTimestamp { timestamp: u64, last_update: u64 },

    /// Token address not registered
    #[error("Unknown token {token}")]
    UnknownToken { token: Address },

    /// Native-asset wrap exceeds the sender's native balance
    #[error("Insufficient native balance for {account}: requested {requested}, balance {balance}")]
    InsufficientNativeBalance {
        account: Address,
        requested: U256,
        balance: U256,
    },
}

impl OniError {
    pub(crate) fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}
