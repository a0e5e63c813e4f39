use cosmwasm_std::{Addr, Api, Env, StdResult, WasmMsg};
use sha2::{Digest, Sha256};

use crate::config::AdminRole;
use crate::msg::{Admin, ModuleInstantiateInfo};

impl ModuleInstantiateInfo {
    pub fn into_wasm_msg(self, contract_addr: Addr) -> WasmMsg {
        WasmMsg::Instantiate {
            admin: match self.admin {
                Admin::Address { address } => Some(address),
                Admin::CoreContract {} => Some(contract_addr.to_string()),
                Admin::None {} => None,
            },
            code_id: self.code_id,
            msg: self.msg,
            funds: vec![],
            label: self.label,
        }
    }
}

impl Admin {
    /// Resolves the descriptor for the minter itself. `CoreContract` means the
    /// contract that sent the instantiation.
    pub fn into_role(self, api: &dyn Api, sender: &Addr) -> StdResult<AdminRole> {
        Ok(match self {
            Admin::Address { address } => AdminRole::Address {
                addr: api.addr_validate(&address)?,
            },
            Admin::CoreContract {} => AdminRole::CoreContract {
                addr: sender.clone(),
            },
            Admin::None {} => AdminRole::None {},
        })
    }
}

/// Seed for the token shuffle: the first 16 bytes of
/// sha256(sender ‖ height ‖ time ‖ tx index).
pub fn entropy(env: &Env, sender: &Addr) -> [u8; 16] {
    let tx_index = env.transaction.as_ref().map(|tx| tx.index).unwrap_or(0);
    let digest = Sha256::digest(
        format!(
            "{}{}{}{}",
            sender,
            env.block.height,
            env.block.time.nanos(),
            tx_index
        )
        .into_bytes(),
    );
    let mut seed = [0u8; 16];
    seed.copy_from_slice(&digest[..16]);
    seed
}
