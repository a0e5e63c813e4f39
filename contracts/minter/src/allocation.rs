use std::collections::BTreeMap;

use cosmwasm_std::{Order, StdError, StdResult, Storage};
use rand_core::SeedableRng;
use rand_xoshiro::Xoshiro128PlusPlus;
use shuffle::{fy::FisherYates, shuffler::Shuffler};

use crate::error::ContractError;
use crate::state::{
    CollectionSlots, ShuffleState, SlotStatus, SupplyRecord, TokenRef, COLLECTION_SUPPLY,
    SHUFFLE_STATE,
};

/// Working copy of the allocation state.
///
/// Every operation mutates memory only. Nothing reaches storage until
/// [`TokenAllocator::save`], so a handler can draw, claim and reserve freely
/// and still bail out without partial writes.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenAllocator {
    state: ShuffleState,
    supplies: BTreeMap<u64, SupplyRecord>,
}

impl TokenAllocator {
    /// Lays out `(collection_id, token_supply)` pairs in arena order, unshuffled.
    pub fn new(collections: &[(u64, u32)]) -> Self {
        let mut layout = Vec::with_capacity(collections.len());
        let mut supplies = BTreeMap::new();
        let mut offset = 0u32;
        for &(collection_id, token_supply) in collections {
            layout.push(CollectionSlots {
                collection_id,
                offset,
                token_supply,
            });
            supplies.insert(
                collection_id,
                SupplyRecord {
                    token_supply,
                    issued: 0,
                },
            );
            offset += token_supply;
        }

        TokenAllocator {
            state: ShuffleState {
                layout,
                order: (0..offset).collect(),
                cursor: 0,
                status: vec![SlotStatus::Pending; offset as usize],
                shuffled: false,
            },
            supplies,
        }
    }

    pub fn load(storage: &dyn Storage) -> StdResult<Self> {
        let state = SHUFFLE_STATE.load(storage)?;
        let supplies = COLLECTION_SUPPLY
            .range(storage, None, None, Order::Ascending)
            .collect::<StdResult<BTreeMap<u64, SupplyRecord>>>()?;
        Ok(TokenAllocator { state, supplies })
    }

    pub fn save(&self, storage: &mut dyn Storage) -> StdResult<()> {
        SHUFFLE_STATE.save(storage, &self.state)?;
        for (collection_id, supply) in &self.supplies {
            COLLECTION_SUPPLY.save(storage, *collection_id, supply)?;
        }
        Ok(())
    }

    pub fn state(&self) -> &ShuffleState {
        &self.state
    }

    pub fn supply(&self, collection_id: u64) -> Option<&SupplyRecord> {
        self.supplies.get(&collection_id)
    }

    pub fn collection_ids(&self) -> Vec<u64> {
        self.supplies.keys().copied().collect()
    }

    pub fn total_supply(&self) -> u32 {
        self.state.status.len() as u32
    }

    pub fn issued(&self) -> u32 {
        self.state.cursor
    }

    /// Tokens not yet issued, reserved ones included.
    pub fn remaining(&self) -> u32 {
        self.total_supply() - self.issued()
    }

    /// Tokens a random draw can still reach.
    pub fn pending(&self) -> u32 {
        self.state.order.len() as u32 - self.state.cursor
    }

    pub fn pending_in(&self, collection_id: u64) -> u32 {
        self.pending_window()
            .iter()
            .filter(|&&slot| self.collection_of(slot) == Some(collection_id))
            .count() as u32
    }

    pub fn is_shuffled(&self) -> bool {
        self.state.shuffled
    }

    pub fn ensure_unlocked(&self) -> Result<(), ContractError> {
        if self.state.cursor > 0 {
            return Err(ContractError::ShuffleLocked {});
        }
        Ok(())
    }

    /// One-time Fisher-Yates permutation of the pending window.
    pub fn initialize_shuffle(&mut self, seed: [u8; 16]) -> Result<(), ContractError> {
        self.ensure_unlocked()?;
        if self.state.shuffled {
            return Err(ContractError::AlreadyShuffled {});
        }

        let mut rng = Xoshiro128PlusPlus::from_seed(seed);
        let mut shuffler = FisherYates::default();
        let cursor = self.state.cursor as usize;
        let mut window = self.state.order.split_off(cursor);
        shuffler
            .shuffle(&mut window, &mut rng)
            .map_err(StdError::generic_err)?;
        self.state.order.append(&mut window);
        self.state.shuffled = true;

        Ok(())
    }

    /// Shuffles with `seed` unless a permutation already exists. Issuing a
    /// token locks the order, so every issuing path calls this first.
    pub fn ensure_shuffled(&mut self, seed: [u8; 16]) -> Result<(), ContractError> {
        if self.state.shuffled {
            return Ok(());
        }
        self.initialize_shuffle(seed)
    }

    /// Draws the next pending token, optionally from a single sub-collection.
    /// Entries skipped over keep their relative order.
    pub fn next_token(&mut self, collection_id: Option<u64>) -> Result<TokenRef, ContractError> {
        let cursor = self.state.cursor as usize;
        let found = match collection_id {
            None => self.state.order.get(cursor).map(|_| cursor),
            Some(id) => self.state.order[cursor..]
                .iter()
                .position(|&slot| self.collection_of(slot) == Some(id))
                .map(|pos| cursor + pos),
        };
        let index = found.ok_or(ContractError::SoldOut {})?;

        self.state.order[cursor..=index].rotate_right(1);
        let slot = self.state.order[cursor];
        self.issue(slot)
    }

    /// Issues a specific token, whether it is pending or reserved. Staged
    /// tokens belong to the custom bundle and are refused.
    pub fn claim(&mut self, token: &TokenRef) -> Result<(), ContractError> {
        let slot = self.slot_of(token)?;
        match self.state.status[slot as usize] {
            SlotStatus::Issued => Err(already_minted(token)),
            SlotStatus::Staged => Err(ContractError::not_eligible(format!(
                "token {}:{} is staged for the custom bundle",
                token.collection_id, token.token_id
            ))),
            SlotStatus::Pending => {
                let cursor = self.state.cursor as usize;
                let index = self.pending_index(slot)?;
                self.state.order[cursor..=index].rotate_right(1);
                self.issue(slot).map(|_| ())
            }
            SlotStatus::Reserved => self.issue_held(slot),
        }
    }

    /// Issues a token staged for the custom bundle.
    pub fn claim_staged(&mut self, token: &TokenRef) -> Result<(), ContractError> {
        let slot = self.slot_of(token)?;
        match self.state.status[slot as usize] {
            SlotStatus::Staged => self.issue_held(slot),
            SlotStatus::Issued => Err(already_minted(token)),
            _ => Err(ContractError::not_eligible(format!(
                "token {}:{} is not staged",
                token.collection_id, token.token_id
            ))),
        }
    }

    /// Takes a pending token out of the random draw for an airdrop claim.
    pub fn reserve(&mut self, token: &TokenRef) -> Result<(), ContractError> {
        self.hold(token, SlotStatus::Reserved)
    }

    /// Takes a pending token out of the random draw for the custom bundle.
    pub fn stage(&mut self, token: &TokenRef) -> Result<(), ContractError> {
        self.hold(token, SlotStatus::Staged)
    }

    /// Puts a staged token back at the end of the pending window. Returns
    /// false when the token was not staged.
    pub fn unstage(&mut self, token: &TokenRef) -> Result<bool, ContractError> {
        let slot = self.slot_of(token)?;
        if self.state.status[slot as usize] != SlotStatus::Staged {
            return Ok(false);
        }
        self.state.order.push(slot);
        self.state.status[slot as usize] = SlotStatus::Pending;
        Ok(true)
    }

    /// Withdraws claimed identities from the pending window. Tokens that are
    /// already out of it, or unknown, are skipped.
    pub fn remove_claimed(&mut self, tokens: &[TokenRef]) -> u32 {
        let mut removed = 0;
        for token in tokens {
            let slot = match self.slot_of(token) {
                Ok(slot) => slot,
                Err(_) => continue,
            };
            if self.state.status[slot as usize] == SlotStatus::Pending && self.reserve(token).is_ok()
            {
                removed += 1;
            }
        }
        removed
    }

    fn hold(&mut self, token: &TokenRef, status: SlotStatus) -> Result<(), ContractError> {
        let slot = self.slot_of(token)?;
        if self.state.status[slot as usize] != SlotStatus::Pending {
            return Err(ContractError::invalid_config(format!(
                "token {}:{} is not available",
                token.collection_id, token.token_id
            )));
        }
        let index = self.pending_index(slot)?;
        self.state.order.remove(index);
        self.state.status[slot as usize] = status;
        Ok(())
    }

    // held slots sit outside `order`, so they enter it at the cursor
    fn issue_held(&mut self, slot: u32) -> Result<(), ContractError> {
        self.state.order.insert(self.state.cursor as usize, slot);
        self.issue(slot).map(|_| ())
    }

    fn issue(&mut self, slot: u32) -> Result<TokenRef, ContractError> {
        let token = self.token_of(slot)?;
        let supply = self
            .supplies
            .get_mut(&token.collection_id)
            .ok_or(ContractError::SoldOut {})?;
        if supply.issued >= supply.token_supply {
            return Err(ContractError::SoldOut {});
        }
        supply.issued += 1;
        self.state.status[slot as usize] = SlotStatus::Issued;
        self.state.cursor += 1;
        Ok(token)
    }

    fn pending_window(&self) -> &[u32] {
        &self.state.order[self.state.cursor as usize..]
    }

    fn pending_index(&self, slot: u32) -> Result<usize, ContractError> {
        self.pending_window()
            .iter()
            .position(|&s| s == slot)
            .map(|pos| self.state.cursor as usize + pos)
            .ok_or_else(|| StdError::generic_err("pending slot missing from token order").into())
    }

    fn collection_of(&self, slot: u32) -> Option<u64> {
        self.state
            .layout
            .iter()
            .find(|c| slot >= c.offset && slot < c.offset + c.token_supply)
            .map(|c| c.collection_id)
    }

    fn token_of(&self, slot: u32) -> Result<TokenRef, ContractError> {
        self.state
            .layout
            .iter()
            .find(|c| slot >= c.offset && slot < c.offset + c.token_supply)
            .map(|c| TokenRef::new(c.collection_id, slot - c.offset + 1))
            .ok_or_else(|| StdError::generic_err("slot outside of arena").into())
    }

    fn slot_of(&self, token: &TokenRef) -> Result<u32, ContractError> {
        self.state
            .layout
            .iter()
            .find(|c| c.collection_id == token.collection_id)
            .filter(|c| token.token_id >= 1 && token.token_id <= c.token_supply)
            .map(|c| c.offset + token.token_id - 1)
            .ok_or(ContractError::InvalidToken {
                collection_id: token.collection_id,
                token_id: token.token_id,
            })
    }
}

fn already_minted(token: &TokenRef) -> ContractError {
    ContractError::not_eligible(format!(
        "token {}:{} was already minted",
        token.collection_id, token.token_id
    ))
}
