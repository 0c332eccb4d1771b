//! Transactional facade over one protocol deployment.
//!
//! [`Protocol`] owns the token registry, the claim-token ledger, the lending
//! pool and the helper, plus the price oracle they read. Every write runs
//! against a scratch copy of [`ProtocolState`] that is committed only when
//! the whole operation succeeds, so a failing call leaves every balance and
//! record exactly as it was.
//!
//! # Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use oni_rs_core::{CallContext, FixedPriceOracle, OraclePrice, PoolConfig, Protocol};
//!
//! let config = PoolConfig::default();
//! let weth = config.addresses.collateral_token;
//! let oracle = FixedPriceOracle::new()
//!     .with_price(weth, OraclePrice::new(U256::from(130_000_000_000u64), 8));
//! let mut protocol = Protocol::new(config.clone(), oracle, 0).unwrap();
//!
//! let alice = Address::with_last_byte(0x0A);
//! let base = config.addresses.base_token;
//! protocol.fund(base, alice, U256::from(2_000_000_000u64)).unwrap();
//! protocol.approve(base, alice, config.addresses.ledger, U256::MAX).unwrap();
//!
//! let minted = protocol
//!     .mint(&CallContext::new(alice, 0), U256::from(2_000_000_000u64))
//!     .unwrap();
//! assert_eq!(minted, U256::from(2_000_000_000u64));
//! assert_eq!(protocol.get_rate().unwrap(), U256::from(1_000_000u64));
//! ```

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::config::PoolConfig;
use crate::context::CallContext;
use crate::error::OniError;
use crate::helper::CollateralHelper;
use crate::irm::InterestParams;
use crate::ledger::{Accrual, ClaimTokenLedger, ReserveSnapshot};
use crate::oracle::PriceOracle;
use crate::pool::{AccountBorrowInfo, AccountPosition, LendingPool};
use crate::token::{Erc20, TokenRegistry};

/// Everything a transaction may mutate.
#[derive(Debug, Clone)]
pub struct ProtocolState {
    pub tokens: TokenRegistry,
    pub ledger: ClaimTokenLedger,
    pub pool: LendingPool,
    pub helper: CollateralHelper,
}

/// Aggregate view of the reserve and rates, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolSummary {
    pub total_base_held: U256,
    pub total_debts: U256,
    pub total_claim_supply: U256,
    pub rate: U256,
    pub utilization_rate: U256,
    pub borrow_rate: U256,
    pub supply_rate: U256,
    pub borrow_index: U256,
    pub last_accrual: u64,
}

#[derive(Debug)]
pub struct Protocol<O: PriceOracle> {
    config: PoolConfig,
    state: ProtocolState,
    oracle: O,
}

impl<O: PriceOracle> Protocol<O> {
    /// Deploys the tokens, ledger, pool and helper described by `config`.
    ///
    /// The pool is granted pool permission on the ledger and approves the
    /// ledger to pull base asset for repayments.
    pub fn new(config: PoolConfig, oracle: O, timestamp: u64) -> Result<Self, OniError> {
        let addrs = config.addresses;
        let pool = LendingPool::new(&config, timestamp)?;

        let mut tokens = TokenRegistry::new();
        tokens.register(Erc20::new(
            addrs.base_token,
            config.base_symbol.clone(),
            config.base_decimals,
        ));
        tokens.register(Erc20::new(
            addrs.collateral_token,
            config.collateral_symbol.clone(),
            config.collateral_decimals,
        ));
        tokens.approve(addrs.base_token, addrs.pool, addrs.ledger, U256::MAX)?;

        let mut ledger = ClaimTokenLedger::new(
            addrs.ledger,
            addrs.base_token,
            &config.base_symbol,
            config.base_decimals,
            config.admin,
        );
        ledger.set_pool_permission(config.admin, addrs.pool, true)?;

        let helper = CollateralHelper::new(addrs.helper, addrs.collateral_token);

        Ok(Self {
            config,
            state: ProtocolState {
                tokens,
                ledger,
                pool,
                helper,
            },
            oracle,
        })
    }

    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut ProtocolState, &O) -> Result<T, OniError>,
    ) -> Result<T, OniError> {
        let mut draft = self.state.clone();
        let out = op(&mut draft, &self.oracle)?;
        self.state = draft;
        Ok(out)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    // ==================== Genesis ====================

    /// Mints `amount` of `token` to `account` outside any transaction
    pub fn fund(&mut self, token: Address, account: Address, amount: U256) -> Result<(), OniError> {
        self.state.tokens.mint(token, account, amount)
    }

    pub fn fund_native(&mut self, account: Address, amount: U256) {
        self.state.tokens.fund_native(account, amount);
    }

    pub fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        self.state.tokens.approve(token, owner, spender, amount)
    }

    /// Wraps the caller's native asset into the collateral token
    pub fn wrap_native(&mut self, account: Address, amount: U256) -> Result<(), OniError> {
        let wrapped = self.config.addresses.collateral_token;
        self.transact(|state, _| state.tokens.wrap_native(wrapped, account, amount))
    }

    // ==================== Depositors ====================

    /// Deposits base asset for claim tokens, accruing the pool first.
    pub fn mint(&mut self, ctx: &CallContext, amount: U256) -> Result<U256, OniError> {
        self.transact(|state, _| {
            state.pool.accrue_interest(&mut state.ledger, &state.tokens, ctx)?;
            state.ledger.mint(&mut state.tokens, ctx.sender, amount)
        })
    }

    /// Redeems claim tokens for base asset, accruing the pool first.
    pub fn burn(&mut self, ctx: &CallContext, claim_amount: U256) -> Result<U256, OniError> {
        self.transact(|state, _| {
            state.pool.accrue_interest(&mut state.ledger, &state.tokens, ctx)?;
            state.ledger.burn(&mut state.tokens, ctx.sender, claim_amount)
        })
    }

    /// Transfers base asset straight to the ledger without minting claims.
    pub fn donate(&mut self, ctx: &CallContext, amount: U256) -> Result<(), OniError> {
        let base = self.config.addresses.base_token;
        let ledger = self.config.addresses.ledger;
        self.transact(|state, _| state.tokens.transfer(base, ctx.sender, ledger, amount))
    }

    // ==================== Borrowers ====================

    pub fn borrow(
        &mut self,
        ctx: &CallContext,
        on_behalf_of: Address,
        collateral_amount: U256,
        borrow_amount: U256,
    ) -> Result<U256, OniError> {
        self.transact(|state, oracle| {
            state.pool.borrow(
                &mut state.ledger,
                &mut state.tokens,
                oracle,
                ctx,
                on_behalf_of,
                collateral_amount,
                borrow_amount,
            )
        })
    }

    /// Returns the caller's remaining debt.
    pub fn repay(&mut self, ctx: &CallContext, amount: U256) -> Result<U256, OniError> {
        self.transact(|state, _| state.pool.repay(&mut state.ledger, &mut state.tokens, ctx, amount))
    }

    /// Returns the caller's remaining collateral.
    pub fn withdraw_collateral(&mut self, ctx: &CallContext, amount: U256) -> Result<U256, OniError> {
        self.transact(|state, oracle| {
            state
                .pool
                .withdraw_collateral(&mut state.ledger, &mut state.tokens, oracle, ctx, amount)
        })
    }

    /// Borrows through the helper with `value` native units attached.
    pub fn helper_borrow(
        &mut self,
        ctx: &CallContext,
        value: U256,
        borrow_amount: U256,
    ) -> Result<U256, OniError> {
        self.transact(|state, oracle| {
            let helper = state.helper;
            helper.borrow(state, oracle, ctx, value, borrow_amount)
        })
    }

    /// Borrows base asset straight from the ledger as a permissioned caller.
    ///
    /// The pool is accrued first; the caller takes on no tracked position.
    pub fn pool_borrow(&mut self, ctx: &CallContext, amount: U256) -> Result<(), OniError> {
        self.transact(|state, _| {
            state.pool.accrue_interest(&mut state.ledger, &state.tokens, ctx)?;
            state
                .ledger
                .accrue_and_borrow(&mut state.tokens, ctx.sender, &Accrual::none(), amount)
        })
    }

    pub fn accrue_interest(&mut self, ctx: &CallContext) -> Result<Accrual, OniError> {
        self.transact(|state, _| state.pool.accrue_interest(&mut state.ledger, &state.tokens, ctx))
    }

    // ==================== Administration ====================

    pub fn set_interest_params(
        &mut self,
        ctx: &CallContext,
        params: InterestParams,
    ) -> Result<(), OniError> {
        self.transact(|state, _| {
            state
                .pool
                .set_interest_params(&mut state.ledger, &state.tokens, ctx, params)
        })?;
        self.config.interest_params = params;
        Ok(())
    }

    pub fn set_pool_permission(
        &mut self,
        ctx: &CallContext,
        pool: Address,
        allowed: bool,
    ) -> Result<(), OniError> {
        self.transact(|state, _| state.ledger.set_pool_permission(ctx.sender, pool, allowed))
    }

    pub fn set_treasury(&mut self, ctx: &CallContext, treasury: Address) -> Result<(), OniError> {
        self.transact(|state, _| {
            state
                .pool
                .set_treasury(&mut state.ledger, &state.tokens, ctx, treasury)
        })?;
        self.config.treasury = treasury;
        Ok(())
    }

    // ==================== Reads ====================

    pub fn reserve(&self) -> Result<ReserveSnapshot, OniError> {
        self.state.ledger.reserve(&self.state.tokens)
    }

    pub fn get_rate(&self) -> Result<U256, OniError> {
        self.state.ledger.get_rate(&self.state.tokens)
    }

    pub fn get_utilization_rate(&self) -> Result<U256, OniError> {
        Ok(self.state.pool.get_utilization_rate(&self.reserve()?))
    }

    pub fn get_borrow_fees(&self) -> Result<U256, OniError> {
        Ok(self.state.pool.get_borrow_fees(&self.reserve()?))
    }

    pub fn get_supply_rate(&self) -> Result<U256, OniError> {
        Ok(self.state.pool.get_supply_rate(&self.reserve()?))
    }

    pub fn total_debts(&self) -> U256 {
        self.state.ledger.total_debts()
    }

    pub fn get_account_borrow_info(&self, account: Address) -> Result<AccountBorrowInfo, OniError> {
        self.state.pool.get_account_borrow_info(account, &self.oracle)
    }

    pub fn account_debt(&self, account: Address) -> U256 {
        self.state.pool.account_debt(account)
    }

    pub fn max_borrow(&self, account: Address) -> Result<U256, OniError> {
        self.state.pool.max_borrow(account, &self.oracle)
    }

    pub fn position(&self, account: Address) -> AccountPosition {
        self.state.pool.position(account)
    }

    pub fn preview_deposit(&self, amount: U256) -> Result<U256, OniError> {
        self.state.ledger.preview_deposit(&self.state.tokens, amount)
    }

    pub fn preview_withdraw(&self, claims: U256) -> Result<U256, OniError> {
        self.state.ledger.preview_withdraw(&self.state.tokens, claims)
    }

    pub fn claim_balance_of(&self, account: Address) -> U256 {
        self.state.ledger.claim_balance_of(account)
    }

    pub fn balance_of(&self, token: Address, account: Address) -> Result<U256, OniError> {
        self.state.tokens.balance_of(token, account)
    }

    pub fn base_balance_of(&self, account: Address) -> Result<U256, OniError> {
        self.balance_of(self.config.addresses.base_token, account)
    }

    pub fn collateral_balance_of(&self, account: Address) -> Result<U256, OniError> {
        self.balance_of(self.config.addresses.collateral_token, account)
    }

    pub fn is_authorized_caller(&self, caller: Address) -> bool {
        self.state.ledger.is_authorized_caller(caller)
    }

    pub fn summary(&self) -> Result<ProtocolSummary, OniError> {
        let reserve = self.reserve()?;
        let pool = &self.state.pool;
        Ok(ProtocolSummary {
            total_base_held: reserve.total_base_held,
            total_debts: reserve.total_debt_outstanding,
            total_claim_supply: reserve.total_claim_supply,
            rate: self.get_rate()?,
            utilization_rate: pool.get_utilization_rate(&reserve),
            borrow_rate: pool.get_borrow_fees(&reserve),
            supply_rate: pool.get_supply_rate(&reserve),
            borrow_index: pool.borrow_index(),
            last_accrual: pool.last_accrual(),
        })
    }
}
