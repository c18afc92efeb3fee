//=====================================================
// File: contract/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Contract collaborators consumed by the interpreter core
// Objective: Transport capability, the deployed-instance index and the
//            per-instance fetcher/command synthesis hook
//=====================================================

pub mod memory;

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;

use crate::core_value::{get_core_value, get_string_v};
use crate::dispatch::{Arg, Command, Fetcher};
use crate::value::{Address, Value};
use crate::world::{Invocation, World};

pub use memory::{MemoryChain, SentTransaction};

//=====================================================
// Section 1.0 - Transport
//=====================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("execution reverted: {reason}")]
    Revert { reason: String },
    #[error("transport failure: {0}")]
    Rpc(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub tx_hash: String,
    pub contract_address: Option<Address>,
    pub logs: Vec<String>,
}

/// Contract-call transport. Implementations own retries and timeouts; the
/// interpreter calls each method once and treats failures as final.
pub trait Transport: Send + Sync {
    /// Unlocked accounts, in the order scenario account names are assigned.
    fn accounts(&self) -> Vec<Address>;

    fn read(&self, address: &Address, method: &str, args: &[Value])
    -> Result<JsonValue, TransportError>;

    fn send(
        &self,
        address: &Address,
        method: &str,
        args: &[Value],
        from: &Address,
    ) -> Result<Receipt, TransportError>;

    fn deploy(&self, artifact: &str, args: &[Value], from: &Address)
    -> Result<Receipt, TransportError>;
}

//=====================================================
// Section 2.0 - Deployed instances
//=====================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ContractInstance {
    pub name: String,
    pub artifact: String,
    pub address: Address,
    sequence: u64,
}

/// Named contract instances known to a world. Re-registering a name
/// replaces the earlier instance.
#[derive(Debug, Clone, Default)]
pub struct ContractIndex {
    instances: BTreeMap<String, ContractInstance>,
    next_sequence: u64,
}

impl ContractIndex {
    pub fn insert(&mut self, name: &str, artifact: &str, address: Address) -> ContractInstance {
        let instance = ContractInstance {
            name: name.to_string(),
            artifact: artifact.to_string(),
            address,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.instances.insert(name.to_string(), instance.clone());
        instance
    }

    pub fn get(&self, name: &str) -> Option<&ContractInstance> {
        self.instances.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.instances.keys().cloned().collect()
    }

    /// Most recently registered instance built from `artifact`.
    pub fn latest_by_artifact(&self, artifact: &str) -> Option<&ContractInstance> {
        self.instances
            .values()
            .filter(|instance| instance.artifact == artifact)
            .max_by_key(|instance| instance.sequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractInstance> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

//=====================================================
// Section 3.0 - Synthesis
//=====================================================

//Function: synthesize_fetchers
//Purpose: Build the `(<Name> ...)` fetcher namespace for one contract instance
//Inputs: world: &World, name: &str
//Returns: one composite fetcher, or nothing when the name is unknown
pub fn synthesize_fetchers(world: &World, name: &str) -> Vec<Fetcher> {
    let Some(instance) = world.contract(name).cloned() else {
        return Vec::new();
    };
    debug!(contract = %instance.name, address = %instance.address, "synthesizing fetchers");

    let address = instance.address;
    let artifact = instance.artifact.clone();
    let sub = vec![
        Fetcher::new("Address", vec![], move |_, _| Ok(Value::Address(address)))
            .describe("Address of the contract instance"),
        Fetcher::new("Artifact", vec![], move |_, _| {
            Ok(Value::String(artifact.clone()))
        })
        .describe("Artifact the instance was deployed from"),
        Fetcher::catch_all(
            "View",
            vec![
                Arg::new("method", get_string_v),
                Arg::new("args", get_core_value).variadic().mapped(),
            ],
            move |world, args| {
                let method = args.string("method")?;
                let raw = world.transport().read(&address, method, args.list("args")?)?;
                Ok(Value::from_json(raw))
            },
        )
        .describe("Read a view method, e.g. `(Token balanceOf Geoff)`"),
    ];

    vec![Fetcher::composite(&instance.name, sub).describe(format!(
        "Contract {} ({})",
        instance.name, instance.artifact
    ))]
}

/// Command namespace for one instance: `(<Name> method args...)` sends a
/// transaction from the acting account.
pub fn synthesize_commands(world: &World, name: &str) -> Vec<Command> {
    let Some(instance) = world.contract(name).cloned() else {
        return Vec::new();
    };
    let target = instance.name.clone();
    let address = instance.address;
    let sub = vec![
        Command::catch_all(
            "Send",
            vec![
                Arg::new("method", get_string_v),
                Arg::new("args", get_core_value).variadic().mapped(),
            ],
            move |world, from, args| {
                let method = args.string("method")?;
                let outcome = world
                    .transport()
                    .send(&address, method, args.list("args")?, from);
                world.settle(Invocation {
                    target: target.clone(),
                    method: method.to_string(),
                    outcome,
                })
            },
        )
        .describe("Send a transaction, e.g. `(Token transfer Geoff 10)`"),
    ];
    vec![Command::composite(&instance.name, sub)]
}


//=====================================================
// End of file
//=====================================================
