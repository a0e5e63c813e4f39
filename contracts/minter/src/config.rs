use cosmwasm_std::{coin, Addr, Api, Coin, DepsMut, StdResult, Storage, Timestamp, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;
use crate::msg::{ConfigPatch, RoyaltyInfoMsg, SharedCollectionInfoMsg};
use crate::state::CONFIG;

// governance parameters
pub const MAX_TOKEN_SUPPLY: u32 = 50_000;
pub const MAX_PER_ADDRESS_MINT: u32 = 50_000;
pub const MAX_BPS: u32 = 10_000;
pub const MAX_BPS_FOR_SECONDARY: u32 = 5_000;

/// Who may run administrative operations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// A specific address.
    Address { addr: Addr },
    /// A delegated core contract, usually the one that instantiated this minter.
    CoreContract { addr: Addr },
    /// Nobody. Only a maintainer, if set, can administer.
    None {},
}

impl AdminRole {
    pub fn authorizes(&self, caller: &Addr) -> bool {
        match self {
            AdminRole::Address { addr } | AdminRole::CoreContract { addr } => addr == caller,
            AdminRole::None {} => false,
        }
    }

    pub fn addr(&self) -> Option<&Addr> {
        match self {
            AdminRole::Address { addr } | AdminRole::CoreContract { addr } => Some(addr),
            AdminRole::None {} => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct RoyaltyInfo {
    pub addr: Addr,
    pub bps: u32,
    pub is_primary: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct SharedCollectionInfo {
    pub mint_revenue_share: Vec<RoyaltyInfo>,
    pub secondary_market_royalties: Vec<RoyaltyInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Config {
    pub admin: AdminRole,
    pub maintainer_addr: Option<Addr>,
    pub airdropper_addr: Option<Addr>,
    pub whitelist_addr: Option<Addr>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub total_token_supply: u32,
    pub max_per_address_mint: u32,
    pub max_per_address_bundle_mint: u32,
    pub mint_price: Uint128,
    pub bundle_mint_price: Uint128,
    pub mint_denom: String,
    pub token_code_id: u64,
    pub escrow_funds: bool,
    pub bundle_enabled: bool,
    pub bundle_completed: bool,
    pub custom_bundle_enabled: bool,
    pub custom_bundle_completed: bool,
    pub custom_bundle_mint_price: Uint128,
    pub custom_bundle_content_count: u32,
    pub extension: SharedCollectionInfo,
}

impl Config {
    pub fn is_admin(&self, caller: &Addr) -> bool {
        self.admin.authorizes(caller)
    }

    pub fn is_maintainer(&self, caller: &Addr) -> bool {
        self.maintainer_addr.as_ref() == Some(caller)
    }

    pub fn can_administer(&self, caller: &Addr) -> bool {
        self.is_admin(caller) || self.is_maintainer(caller)
    }

    pub fn assert_can_administer(&self, caller: &Addr) -> Result<(), ContractError> {
        if !self.can_administer(caller) {
            return Err(ContractError::Unauthorized(
                "Sender is not an admin or maintainer".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn price(&self, amount: Uint128) -> Coin {
        coin(amount.u128(), &self.mint_denom)
    }

    /// Cross-field invariants. Run after every create or patch.
    pub fn validate(&self) -> Result<(), ContractError> {
        if let Some(end_time) = self.end_time {
            if self.start_time > end_time {
                return Err(ContractError::invalid_config(
                    "start_time must not be after end_time",
                ));
            }
        }

        if !(1..=MAX_TOKEN_SUPPLY).contains(&self.total_token_supply) {
            return Err(ContractError::invalid_config(format!(
                "total_token_supply must be between 1 and {}",
                MAX_TOKEN_SUPPLY
            )));
        }

        validate_cap(
            "max_per_address_mint",
            self.max_per_address_mint,
            self.total_token_supply,
        )?;
        validate_cap(
            "max_per_address_bundle_mint",
            self.max_per_address_bundle_mint,
            self.total_token_supply,
        )?;

        validate_native_denom(&self.mint_denom)?;
        validate_revenue_share(&self.extension.mint_revenue_share)?;
        validate_secondary_royalties(&self.extension.secondary_market_royalties)
    }

    /// Partial update. Absent fields keep their current value.
    pub fn apply_patch(&mut self, api: &dyn Api, patch: ConfigPatch) -> Result<(), ContractError> {
        let maintainer = validate_addr(api, patch.maintainer_address)?;
        self.maintainer_addr = patched(
            "maintainer_address",
            self.maintainer_addr.clone(),
            maintainer,
            patch.clear_maintainer_address,
        )?;
        let airdropper = validate_addr(api, patch.airdropper_address)?;
        self.airdropper_addr = patched(
            "airdropper_address",
            self.airdropper_addr.clone(),
            airdropper,
            patch.clear_airdropper_address,
        )?;
        let whitelist = validate_addr(api, patch.whitelist_address)?;
        self.whitelist_addr = patched(
            "whitelist_address",
            self.whitelist_addr.clone(),
            whitelist,
            patch.clear_whitelist_address,
        )?;
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        self.end_time = patched(
            "end_time",
            self.end_time,
            patch.end_time,
            patch.clear_end_time,
        )?;
        if let Some(max) = patch.max_per_address_mint {
            self.max_per_address_mint = max;
        }
        if let Some(max) = patch.max_per_address_bundle_mint {
            self.max_per_address_bundle_mint = max;
        }
        if let Some(price) = patch.mint_price {
            self.mint_price = price;
        }
        if let Some(price) = patch.bundle_mint_price {
            self.bundle_mint_price = price;
        }
        if let Some(denom) = patch.mint_denom {
            self.mint_denom = denom;
        }
        if let Some(escrow_funds) = patch.escrow_funds {
            self.escrow_funds = escrow_funds;
        }
        if let Some(bundle_enabled) = patch.bundle_enabled {
            self.bundle_enabled = bundle_enabled;
        }
        if let Some(extension) = patch.extension {
            self.extension = shared_collection_info(api, extension)?;
        }
        Ok(())
    }
}

pub fn load(storage: &dyn Storage) -> StdResult<Config> {
    CONFIG.load(storage)
}

/// Applies `patch` for an administering `caller` and persists the result.
pub fn update(
    deps: DepsMut,
    now: Timestamp,
    caller: &Addr,
    patch: ConfigPatch,
) -> Result<Config, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    config.assert_can_administer(caller)?;

    if let Some(end_time) = patch.end_time {
        if end_time <= now {
            return Err(ContractError::invalid_config(
                "end_time must be in the future",
            ));
        }
    }

    config.apply_patch(deps.api, patch)?;
    config.validate()?;
    CONFIG.save(deps.storage, &config)?;

    Ok(config)
}

pub fn shared_collection_info(
    api: &dyn Api,
    msg: SharedCollectionInfoMsg,
) -> StdResult<SharedCollectionInfo> {
    Ok(SharedCollectionInfo {
        mint_revenue_share: royalties(api, msg.mint_revenue_share)?,
        secondary_market_royalties: royalties(api, msg.secondary_market_royalties)?,
    })
}

fn royalties(api: &dyn Api, msgs: Vec<RoyaltyInfoMsg>) -> StdResult<Vec<RoyaltyInfo>> {
    msgs.into_iter()
        .map(|msg| {
            Ok(RoyaltyInfo {
                addr: api.addr_validate(&msg.address)?,
                bps: msg.bps,
                is_primary: msg.is_primary,
            })
        })
        .collect()
}

fn validate_addr(api: &dyn Api, address: Option<String>) -> StdResult<Option<Addr>> {
    address.map(|address| api.addr_validate(&address)).transpose()
}

// value of an optional field after a set or clear
fn patched<T>(
    field: &str,
    current: Option<T>,
    value: Option<T>,
    clear: bool,
) -> Result<Option<T>, ContractError> {
    match (value, clear) {
        (Some(_), true) => Err(ContractError::invalid_config(format!(
            "{} cannot be set and cleared at once",
            field
        ))),
        (Some(value), false) => Ok(Some(value)),
        (None, true) => Ok(None),
        (None, false) => Ok(current),
    }
}

fn validate_cap(field: &str, cap: u32, total_token_supply: u32) -> Result<(), ContractError> {
    if cap < 1 || cap > MAX_PER_ADDRESS_MINT || cap > total_token_supply {
        return Err(ContractError::invalid_config(format!(
            "{} must be between 1 and {}, got {}",
            field,
            MAX_PER_ADDRESS_MINT.min(total_token_supply),
            cap
        )));
    }
    Ok(())
}

fn validate_revenue_share(shares: &[RoyaltyInfo]) -> Result<(), ContractError> {
    let running_bps: u32 = shares.iter().map(|share| share.bps).sum();
    if running_bps > MAX_BPS {
        return Err(ContractError::invalid_config(format!(
            "mint revenue share adds up to {} bps, max is {}",
            running_bps, MAX_BPS
        )));
    }
    if shares.iter().filter(|share| share.is_primary).count() != 1 {
        return Err(ContractError::invalid_config(
            "mint revenue share needs exactly one primary address",
        ));
    }
    Ok(())
}

fn validate_secondary_royalties(royalties: &[RoyaltyInfo]) -> Result<(), ContractError> {
    let running_bps: u32 = royalties.iter().map(|royalty| royalty.bps).sum();
    if running_bps > MAX_BPS_FOR_SECONDARY {
        return Err(ContractError::invalid_config(format!(
            "secondary royalties add up to {} bps, max is {}",
            running_bps, MAX_BPS_FOR_SECONDARY
        )));
    }
    if royalties.iter().filter(|royalty| royalty.is_primary).count() > 1 {
        return Err(ContractError::invalid_config(
            "secondary royalties allow at most one primary address",
        ));
    }
    Ok(())
}

/// Native and ibc/ denoms only.
pub fn validate_native_denom(denom: &str) -> Result<(), ContractError> {
    if denom.len() < 3 || denom.len() > 128 {
        return Err(ContractError::invalid_config(format!(
            "mint_denom length must be between 3 and 128, got {}",
            denom.len()
        )));
    }

    let mut chars = denom.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => {
            return Err(ContractError::invalid_config(
                "mint_denom must start with an ascii letter",
            ))
        }
    }

    if let Some(c) = chars.find(|c| {
        !(c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
    }) {
        return Err(ContractError::invalid_config(format!(
            "mint_denom contains invalid character '{}'",
            c
        )));
    }

    Ok(())
}
