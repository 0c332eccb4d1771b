//! Claim-token ledger over the base-asset reserve.
//!
//! The ledger custodies every unit of base-asset liquidity and issues claim
//! tokens against it. Its value per claim is
//!
//! ```text
//! exchange_rate = (total_base_held + total_debt_outstanding) * WAD / total_claim_supply
//! ```
//!
//! with a bootstrap rate of exactly one base unit per claim while no claims
//! exist. `total_base_held` is the ledger's balance on the base token, so
//! transfers made straight to the ledger raise the rate for every holder.
//!
//! Debt only changes through the privileged `accrue*` entry points. New
//! borrowing requires live pool permission, while booking interest and
//! repaying stay open to pools whose permission was revoked. An empty
//! accrual needs no permission at all.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::{Admin, Authorizer, PoolPermissions};
use crate::error::OniError;
use crate::math::{mul_div_down, pow10, w_div_down, WAD};
use crate::token::{Erc20, TokenRegistry};

/// Interest to book on the ledger before a pool operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accrual {
    /// Interest added to the outstanding debt
    pub interest: U256,
    /// Part of `interest` owed to the treasury
    pub treasury_interest: U256,
    /// Treasury receiving claim tokens for its part
    pub treasury: Address,
}

impl Accrual {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.interest.is_zero()
    }
}

/// The three reserve counters, read at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveSnapshot {
    pub total_base_held: U256,
    pub total_debt_outstanding: U256,
    pub total_claim_supply: U256,
}

impl ReserveSnapshot {
    /// Idle liquidity plus outstanding debt
    pub fn total_assets(&self) -> U256 {
        self.total_base_held + self.total_debt_outstanding
    }

    /// WAD-scaled base units per claim token
    pub fn exchange_rate(&self) -> U256 {
        if self.total_claim_supply.is_zero() {
            return WAD;
        }
        w_div_down(self.total_assets(), self.total_claim_supply)
    }

    /// Claims minted for a deposit of `amount` base units
    pub fn to_claims(&self, amount: U256) -> U256 {
        let total_assets = self.total_assets();
        if self.total_claim_supply.is_zero() || total_assets.is_zero() {
            return amount;
        }
        mul_div_down(amount, self.total_claim_supply, total_assets)
    }

    /// Base units redeemed by burning `claims`
    pub fn to_base(&self, claims: U256) -> U256 {
        if self.total_claim_supply.is_zero() {
            return claims;
        }
        mul_div_down(claims, self.total_assets(), self.total_claim_supply)
    }
}

/// The claim-token ledger ("OniBean").
#[derive(Debug, Clone)]
pub struct ClaimTokenLedger {
    address: Address,
    base_token: Address,
    base_decimals: u8,
    claims: Erc20,
    total_debts: U256,
    admin: Admin,
    permissions: PoolPermissions,
}

impl ClaimTokenLedger {
    pub fn new(
        address: Address,
        base_token: Address,
        base_symbol: &str,
        base_decimals: u8,
        admin: Address,
    ) -> Self {
        Self {
            address,
            base_token,
            base_decimals,
            claims: Erc20::new(address, format!("oni{base_symbol}"), base_decimals),
            total_debts: U256::ZERO,
            admin: Admin(admin),
            permissions: PoolPermissions::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn base_token(&self) -> Address {
        self.base_token
    }

    pub fn claim_symbol(&self) -> &str {
        &self.claims.symbol
    }

    // ==================== Reads ====================

    pub fn reserve(&self, tokens: &TokenRegistry) -> Result<ReserveSnapshot, OniError> {
        Ok(ReserveSnapshot {
            total_base_held: tokens.balance_of(self.base_token, self.address)?,
            total_debt_outstanding: self.total_debts,
            total_claim_supply: self.claims.total_supply,
        })
    }

    /// WAD-scaled exchange rate
    pub fn exchange_rate(&self, tokens: &TokenRegistry) -> Result<U256, OniError> {
        Ok(self.reserve(tokens)?.exchange_rate())
    }

    /// Base units per claim token, scaled to the base asset's decimals
    pub fn get_rate(&self, tokens: &TokenRegistry) -> Result<U256, OniError> {
        let reserve = self.reserve(tokens)?;
        let unit = pow10(self.base_decimals);
        if reserve.total_claim_supply.is_zero() {
            return Ok(unit);
        }
        Ok(mul_div_down(
            reserve.total_assets(),
            unit,
            reserve.total_claim_supply,
        ))
    }

    pub fn total_debts(&self) -> U256 {
        self.total_debts
    }

    pub fn total_claim_supply(&self) -> U256 {
        self.claims.total_supply
    }

    pub fn claim_balance_of(&self, account: Address) -> U256 {
        self.claims.balance_of(account)
    }

    pub fn preview_deposit(&self, tokens: &TokenRegistry, amount: U256) -> Result<U256, OniError> {
        Ok(self.reserve(tokens)?.to_claims(amount))
    }

    pub fn preview_withdraw(&self, tokens: &TokenRegistry, claims: U256) -> Result<U256, OniError> {
        Ok(self.reserve(tokens)?.to_base(claims))
    }

    pub fn is_authorized_caller(&self, caller: Address) -> bool {
        self.permissions.is_authorized_caller(caller)
    }

    // ==================== Depositor Operations ====================

    /// Deposits `amount` base units from `caller` and mints claim tokens.
    ///
    /// Returns the number of claims minted.
    pub fn mint(
        &mut self,
        tokens: &mut TokenRegistry,
        caller: Address,
        amount: U256,
    ) -> Result<U256, OniError> {
        let minted = self.reserve(tokens)?.to_claims(amount);

        tokens.transfer_from(self.base_token, self.address, caller, self.address, amount)?;
        self.claims.mint(caller, minted);

        info!(%caller, %amount, %minted, "minted claims");
        Ok(minted)
    }

    /// Burns `claim_amount` claim tokens from `caller` and pays out base units.
    ///
    /// Returns the base amount paid. Outstanding debt is not liquid, so the
    /// payout must fit in the idle reserve.
    pub fn burn(
        &mut self,
        tokens: &mut TokenRegistry,
        caller: Address,
        claim_amount: U256,
    ) -> Result<U256, OniError> {
        let balance = self.claims.balance_of(caller);
        if claim_amount > balance {
            return Err(OniError::InsufficientClaimBalance {
                account: caller,
                requested: claim_amount,
                balance,
            });
        }

        let reserve = self.reserve(tokens)?;
        let base_owed = reserve.to_base(claim_amount);
        if base_owed > reserve.total_base_held {
            return Err(OniError::InsufficientLiquidity {
                requested: base_owed,
                available: reserve.total_base_held,
            });
        }

        self.claims.burn(caller, claim_amount)?;
        tokens.transfer(self.base_token, self.address, caller, base_owed)?;

        info!(%caller, %claim_amount, %base_owed, "burned claims");
        Ok(base_owed)
    }

    // ==================== Administration ====================

    pub fn set_pool_permission(
        &mut self,
        caller: Address,
        pool: Address,
        allowed: bool,
    ) -> Result<(), OniError> {
        self.admin.ensure_authorized(caller)?;
        self.permissions.set(pool, allowed);
        info!(%pool, allowed, "pool permission updated");
        Ok(())
    }

    // ==================== Pool Entry Points ====================

    /// Books accrued interest without moving liquidity.
    ///
    /// The treasury's part is minted as claim tokens at the post-interest
    /// exchange rate, so depositors keep exactly the remainder.
    pub fn accrue(
        &mut self,
        tokens: &TokenRegistry,
        caller: Address,
        accrual: &Accrual,
    ) -> Result<(), OniError> {
        if accrual.is_empty() {
            return Ok(());
        }
        self.permissions.ensure_can_settle(caller)?;
        self.book_accrual(tokens, accrual)
    }

    /// Books `accrual`, then lends `amount` base units to `caller`.
    pub fn accrue_and_borrow(
        &mut self,
        tokens: &mut TokenRegistry,
        caller: Address,
        accrual: &Accrual,
        amount: U256,
    ) -> Result<(), OniError> {
        self.permissions.ensure_authorized(caller)?;
        self.book_accrual(tokens, accrual)?;

        let available = tokens.balance_of(self.base_token, self.address)?;
        if amount > available {
            return Err(OniError::InsufficientLiquidity {
                requested: amount,
                available,
            });
        }

        tokens.transfer(self.base_token, self.address, caller, amount)?;
        self.total_debts += amount;

        debug!(%caller, %amount, total_debts = %self.total_debts, "pool borrow");
        Ok(())
    }

    /// Books `accrual`, then pulls `amount` base units back from `caller`.
    pub fn accrue_and_repay(
        &mut self,
        tokens: &mut TokenRegistry,
        caller: Address,
        accrual: &Accrual,
        amount: U256,
    ) -> Result<(), OniError> {
        self.permissions.ensure_can_settle(caller)?;
        self.book_accrual(tokens, accrual)?;

        tokens.transfer_from(self.base_token, self.address, caller, self.address, amount)?;
        // Per-account debts are floored individually, so their sum can trail
        // the aggregate by a few units.
        self.total_debts = self.total_debts.saturating_sub(amount);

        debug!(%caller, %amount, total_debts = %self.total_debts, "pool repay");
        Ok(())
    }

    fn book_accrual(&mut self, tokens: &TokenRegistry, accrual: &Accrual) -> Result<(), OniError> {
        if accrual.is_empty() {
            return Ok(());
        }

        self.total_debts += accrual.interest;

        if !accrual.treasury_interest.is_zero() {
            let reserve = self.reserve(tokens)?;
            let fee_claims = ReserveSnapshot {
                total_base_held: reserve.total_base_held,
                total_debt_outstanding: reserve
                    .total_debt_outstanding
                    .saturating_sub(accrual.treasury_interest),
                total_claim_supply: reserve.total_claim_supply,
            }
            .to_claims(accrual.treasury_interest);
            self.claims.mint(accrual.treasury, fee_claims);
        }

        debug!(
            interest = %accrual.interest,
            treasury_interest = %accrual.treasury_interest,
            total_debts = %self.total_debts,
            "booked accrual"
        );
        Ok(())
    }
}
