use std::fmt;

use cosmwasm_std::{Addr, Order, StdResult, Storage, Timestamp};
use cw_storage_plus::{Bound, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ContractError;
use crate::state::{
    ADDRESS_MINT_TRACKER, AIRDROP_MINT_TRACKER, BUNDLE_MINT_TRACKER, CUSTOM_BUNDLE_MINT_TRACKER,
    WHITELIST_MINT_TRACKER,
};

/// Independent mint pathway with its own per-address tracker.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MintChannel {
    Public,
    Whitelist,
    Airdrop,
    Bundle,
    CustomBundle,
}

impl fmt::Display for MintChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintChannel::Public => "public",
            MintChannel::Whitelist => "whitelist",
            MintChannel::Airdrop => "airdrop",
            MintChannel::Bundle => "bundle",
            MintChannel::CustomBundle => "custom bundle",
        };
        f.write_str(name)
    }
}

impl MintChannel {
    fn tracker(self) -> Map<'static, Addr, u32> {
        match self {
            MintChannel::Public => ADDRESS_MINT_TRACKER,
            MintChannel::Whitelist => WHITELIST_MINT_TRACKER,
            MintChannel::Airdrop => AIRDROP_MINT_TRACKER,
            MintChannel::Bundle => BUNDLE_MINT_TRACKER,
            MintChannel::CustomBundle => CUSTOM_BUNDLE_MINT_TRACKER,
        }
    }

    /// Local per-address cap. Gated channels are capped by their collaborator.
    pub fn cap(self, config: &Config) -> Option<u32> {
        match self {
            MintChannel::Public => Some(config.max_per_address_mint),
            MintChannel::Bundle | MintChannel::CustomBundle => {
                Some(config.max_per_address_bundle_mint)
            }
            MintChannel::Whitelist | MintChannel::Airdrop => None,
        }
    }

    /// Whether the channel only opens at `start_time`. Whitelist and airdrop
    /// mints run before it, under their collaborator's own schedule.
    fn gated_by_start_time(self) -> bool {
        !matches!(self, MintChannel::Whitelist | MintChannel::Airdrop)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    NotStarted,
    Active,
    Completed,
    Expired,
}

/// Evaluated on every call from the clock and the completion flags; never stored.
pub fn channel_state(config: &Config, now: Timestamp, channel: MintChannel) -> ChannelState {
    if let Some(end_time) = config.end_time {
        if now >= end_time {
            return ChannelState::Expired;
        }
    }
    match channel {
        MintChannel::Bundle if config.bundle_completed => return ChannelState::Completed,
        MintChannel::Bundle if !config.bundle_enabled => return ChannelState::NotStarted,
        MintChannel::CustomBundle if config.custom_bundle_completed => {
            return ChannelState::Completed
        }
        MintChannel::CustomBundle if !config.custom_bundle_enabled => {
            return ChannelState::NotStarted
        }
        _ => {}
    }
    if channel.gated_by_start_time() && now < config.start_time {
        return ChannelState::NotStarted;
    }
    ChannelState::Active
}

pub fn peek(storage: &dyn Storage, address: &Addr, channel: MintChannel) -> StdResult<u32> {
    Ok(channel
        .tracker()
        .may_load(storage, address.clone())?
        .unwrap_or(0))
}

/// Tracker entries of `channel` in address order, after `start_after`.
pub fn list(
    storage: &dyn Storage,
    channel: MintChannel,
    start_after: Option<Addr>,
    limit: usize,
) -> StdResult<Vec<(Addr, u32)>> {
    let start = start_after.map(Bound::<Addr>::exclusive);
    channel
        .tracker()
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .collect()
}

/// Count `address` would reach after `units` more mints on `channel`.
/// Reads only.
pub fn check(
    storage: &dyn Storage,
    config: &Config,
    now: Timestamp,
    address: &Addr,
    channel: MintChannel,
    units: u32,
) -> Result<u32, ContractError> {
    match channel_state(config, now, channel) {
        ChannelState::Active => {}
        ChannelState::NotStarted => {
            return Err(ContractError::minting_closed(format!(
                "{} mint has not started",
                channel
            )))
        }
        ChannelState::Completed => {
            return Err(ContractError::minting_closed(format!(
                "{} mint is completed",
                channel
            )))
        }
        ChannelState::Expired => {
            return Err(ContractError::minting_closed(format!(
                "{} mint has ended",
                channel
            )))
        }
    }

    let new_count = peek(storage, address, channel)? + units;
    if let Some(cap) = channel.cap(config) {
        if new_count > cap {
            return Err(ContractError::CapExceeded { channel, cap });
        }
    }
    Ok(new_count)
}

pub fn record_mint(
    storage: &mut dyn Storage,
    config: &Config,
    now: Timestamp,
    address: &Addr,
    channel: MintChannel,
) -> Result<u32, ContractError> {
    record_units(storage, config, now, address, channel, 1)
}

pub fn record_units(
    storage: &mut dyn Storage,
    config: &Config,
    now: Timestamp,
    address: &Addr,
    channel: MintChannel,
    units: u32,
) -> Result<u32, ContractError> {
    let new_count = check(storage, config, now, address, channel, units)?;
    channel.tracker().save(storage, address.clone(), &new_count)?;
    Ok(new_count)
}
