//! Oni Lending Core
//!
//! This crate implements the accounting core of the Oni collateralized
//! lending pool: a utilization-driven interest rate curve, a claim-token
//! ledger over pooled base-asset deposits, and a lending pool that lends that
//! liquidity against oracle-priced collateral.
//!
//! # Overview
//!
//! The core lets you:
//! - Price borrowing with a two-slope utilization curve
//! - Deposit base asset for yield-bearing claim tokens and redeem them
//! - Borrow against collateral, paying an origination fee split with a treasury
//! - Accrue interest lazily through a global debt index
//! - Inspect account health, borrowing capacity and pool rates
//!
//! All amounts are `U256` fixed-point integers: rates are WAD-scaled (1e18 =
//! 100%), amounts use each token's own decimals.
//!
//! # Example
//!
//! ```rust,ignore
//! use oni_rs_core::{CallContext, FixedPriceOracle, PoolConfig, Protocol};
//!
//! let mut protocol = Protocol::new(PoolConfig::default(), oracle, now)?;
//!
//! // Alice supplies 2000 BEAN, Bob borrows 1000 against 1 WETH
//! protocol.mint(&CallContext::new(alice, now), bean(2000))?;
//! let received = protocol.borrow(&CallContext::new(bob, now), bob, weth(1), bean(1000))?;
//!
//! let info = protocol.get_account_borrow_info(bob)?;
//! println!("health: {}", info.health);
//! ```

pub mod access;
pub mod config;
pub mod context;
pub mod error;
pub mod helper;
pub mod irm;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod pool;
pub mod protocol;
pub mod token;

// Re-export commonly used types
pub use error::OniError;

pub use access::{Admin, Authorizer, PoolPermissions};
pub use config::{
    DeploymentAddresses, PoolConfig, DEFAULT_LIQUIDATION_THRESHOLD, DEFAULT_RESERVE_FACTOR,
    DEFAULT_TREASURY_SHARE,
};
pub use context::CallContext;
pub use helper::CollateralHelper;
pub use ledger::{Accrual, ClaimTokenLedger, ReserveSnapshot};
pub use oracle::{FixedPriceOracle, OraclePrice, PriceOracle};
pub use pool::{AccountBorrowInfo, AccountPosition, AccrualPreview, LendingPool};
pub use protocol::{Protocol, ProtocolState, ProtocolSummary};
pub use token::{Erc20, TokenRegistry};

// Math exports
pub use math::{SECONDS_PER_YEAR, WAD};

// IRM exports
pub use irm::{
    get_borrow_rate, get_utilization_rate, InterestParams, DEFAULT_BORROW_BASE, DEFAULT_R_SLOPE1,
    DEFAULT_R_SLOPE2, DEFAULT_U_OPTIMAL,
};
