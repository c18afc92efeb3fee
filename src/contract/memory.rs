//=====================================================
// File: contract/memory.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: In-process transport for dry runs and tests
// Objective: Deterministic addresses, stubbed view results, scripted reverts
//=====================================================

use std::collections::BTreeMap;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::Value as JsonValue;
use tracing::trace;

use super::{Receipt, Transport, TransportError};
use crate::value::{ADDRESS_BYTES, Address, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct SentTransaction {
    pub to: Address,
    pub method: String,
    pub args: Vec<String>,
    pub from: Address,
}

#[derive(Debug)]
struct ChainState {
    rng: StdRng,
    accounts: Vec<Address>,
    deployed: BTreeMap<Address, String>,
    stubs: BTreeMap<(Address, String), JsonValue>,
    reverts: BTreeMap<String, String>,
    sent: Vec<SentTransaction>,
    nonce: u64,
}

impl ChainState {
    fn next_address(&mut self) -> Address {
        let mut bytes = [0u8; ADDRESS_BYTES];
        self.rng.fill_bytes(&mut bytes);
        Address::from_bytes(bytes)
    }

    fn next_hash(&mut self) -> String {
        self.nonce += 1;
        format!("0x{:064x}", self.nonce)
    }
}

/// A chain that lives in memory. Reads return whatever was stubbed with
/// [`MemoryChain::stub_read`]; methods registered with
/// [`MemoryChain::revert_on`] revert on send.
#[derive(Debug)]
pub struct MemoryChain {
    state: Mutex<ChainState>,
}

impl MemoryChain {
    pub fn new(seed: u64, account_count: usize) -> Self {
        let mut state = ChainState {
            rng: StdRng::seed_from_u64(seed),
            accounts: Vec::with_capacity(account_count),
            deployed: BTreeMap::new(),
            stubs: BTreeMap::new(),
            reverts: BTreeMap::new(),
            sent: Vec::new(),
            nonce: 0,
        };
        for _ in 0..account_count {
            let account = state.next_address();
            state.accounts.push(account);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn stub_read(&self, address: Address, method: &str, result: JsonValue) {
        self.state
            .lock()
            .stubs
            .insert((address, method.to_string()), result);
    }

    pub fn revert_on(&self, method: &str, reason: &str) {
        self.state
            .lock()
            .reverts
            .insert(method.to_string(), reason.to_string());
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state.lock().sent.clone()
    }

    pub fn artifact_at(&self, address: &Address) -> Option<String> {
        self.state.lock().deployed.get(address).cloned()
    }
}

impl Transport for MemoryChain {
    fn accounts(&self) -> Vec<Address> {
        self.state.lock().accounts.clone()
    }

    fn read(
        &self,
        address: &Address,
        method: &str,
        _args: &[Value],
    ) -> Result<JsonValue, TransportError> {
        let state = self.state.lock();
        if !state.deployed.contains_key(address) {
            return Err(TransportError::Rpc(format!("no contract deployed at {address}")));
        }
        state
            .stubs
            .get(&(*address, method.to_string()))
            .cloned()
            .ok_or_else(|| TransportError::Revert {
                reason: format!("no result for `{method}` at {address}"),
            })
    }

    fn send(
        &self,
        address: &Address,
        method: &str,
        args: &[Value],
        from: &Address,
    ) -> Result<Receipt, TransportError> {
        let mut state = self.state.lock();
        if !state.deployed.contains_key(address) {
            return Err(TransportError::Rpc(format!("no contract deployed at {address}")));
        }
        if let Some(reason) = state.reverts.get(method) {
            return Err(TransportError::Revert {
                reason: reason.clone(),
            });
        }
        trace!(%address, method, "memory chain send");
        state.sent.push(SentTransaction {
            to: *address,
            method: method.to_string(),
            args: args.iter().map(Value::to_string).collect(),
            from: *from,
        });
        Ok(Receipt {
            tx_hash: state.next_hash(),
            contract_address: None,
            logs: Vec::new(),
        })
    }

    fn deploy(
        &self,
        artifact: &str,
        _args: &[Value],
        _from: &Address,
    ) -> Result<Receipt, TransportError> {
        let mut state = self.state.lock();
        let address = state.next_address();
        state.deployed.insert(address, artifact.to_string());
        trace!(%address, artifact, "memory chain deploy");
        Ok(Receipt {
            tx_hash: state.next_hash(),
            contract_address: Some(address),
            logs: vec![format!("deployed {artifact} at {address}")],
        })
    }
}


//=====================================================
// End of file
//=====================================================
