use cosmwasm_std::{coins, Addr, BankMsg, CosmosMsg, StdResult, Storage, Uint128};
use sg_std::StargazeMsgWrapper;

use crate::config::{Config, MAX_BPS};
use crate::state::{BANK_BALANCES, ESCROW_TOTALS};

pub fn balance(storage: &dyn Storage, address: &Addr) -> StdResult<Uint128> {
    Ok(BANK_BALANCES
        .may_load(storage, address.clone())?
        .unwrap_or_default())
}

pub fn deposit(storage: &mut dyn Storage, address: &Addr, amount: Uint128) -> StdResult<()> {
    if amount.is_zero() {
        return Ok(());
    }
    BANK_BALANCES.update(storage, address.clone(), |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    let mut totals = ESCROW_TOTALS.may_load(storage)?.unwrap_or_default();
    totals.deposited = totals.deposited.checked_add(amount)?;
    ESCROW_TOTALS.save(storage, &totals)
}

/// Zeroes the balance of `address` and returns what it held. The entry is
/// kept so the address still shows up in escrow listings.
pub fn disburse(storage: &mut dyn Storage, address: &Addr) -> StdResult<Uint128> {
    let amount = balance(storage, address)?;
    if amount.is_zero() {
        return Ok(amount);
    }
    BANK_BALANCES.save(storage, address.clone(), &Uint128::zero())?;
    let mut totals = ESCROW_TOTALS.may_load(storage)?.unwrap_or_default();
    totals.disbursed = totals.disbursed.checked_add(amount)?;
    ESCROW_TOTALS.save(storage, &totals)?;
    Ok(amount)
}

/// Splits `amount` over the mint revenue share. The primary recipient comes
/// last and absorbs the rounding dust.
pub fn split_revenue(config: &Config, amount: Uint128) -> Vec<(Addr, Uint128)> {
    let mut shares = config.extension.mint_revenue_share.clone();
    shares.sort_by_key(|share| share.is_primary);

    let mut remaining = amount;
    shares
        .into_iter()
        .map(|share| {
            let portion = if share.is_primary {
                remaining
            } else {
                amount.multiply_ratio(share.bps, MAX_BPS)
            };
            remaining = remaining.saturating_sub(portion);
            (share.addr, portion)
        })
        .filter(|(_, portion)| !portion.is_zero())
        .collect()
}

/// Escrows the split of `amount` when escrow mode is on, otherwise returns the
/// bank sends that pay it out.
pub fn disburse_or_escrow(
    storage: &mut dyn Storage,
    config: &Config,
    amount: Uint128,
) -> StdResult<Vec<CosmosMsg<StargazeMsgWrapper>>> {
    let mut msgs = vec![];
    for (addr, portion) in split_revenue(config, amount) {
        if config.escrow_funds {
            deposit(storage, &addr, portion)?;
        } else {
            msgs.push(CosmosMsg::Bank(BankMsg::Send {
                to_address: addr.to_string(),
                amount: coins(portion.u128(), &config.mint_denom),
            }));
        }
    }
    Ok(msgs)
}
