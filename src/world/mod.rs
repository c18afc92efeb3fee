//=====================================================
// File: world/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Immutable scenario context
// Objective: Hold accounts, contracts, variables and the fetcher registry
//            cache; every update yields a new snapshot
//=====================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::contract::{self, ContractIndex, ContractInstance, Receipt, Transport, TransportError};
use crate::dispatch::Fetcher;
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::{Address, Value};

pub type Synthesizer = Arc<dyn Fn(&World, &str) -> Vec<Fetcher> + Send + Sync>;

//=====================================================
// Section 1.0 - Collaborator shapes
//=====================================================

/// Source of implicit argument values.
pub trait SlotLookup: Send + Sync {
    fn lookup(&self, world: &World, slot: &str) -> Option<Value>;
}

/// Explicit slots, then variables, then a contract with that name, then the
/// newest contract deployed from an artifact of that name.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSlots;

impl SlotLookup for DefaultSlots {
    fn lookup(&self, world: &World, slot: &str) -> Option<Value> {
        if let Some(value) = world.slots.get(slot) {
            return Some(value.clone());
        }
        if let Some(value) = world.vars.get(slot) {
            return Some(value.clone());
        }
        world
            .contracts
            .get(slot)
            .or_else(|| world.contracts.latest_by_artifact(slot))
            .map(|instance| Value::Address(instance.address))
    }
}

/// Result of the most recent send or deploy.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: String,
    pub method: String,
    pub outcome: Result<Receipt, TransportError>,
}

impl Invocation {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

//=====================================================
// Section 2.0 - World
//=====================================================

#[derive(Clone)]
pub struct World {
    transport: Arc<dyn Transport>,
    settings: Arc<Settings>,
    accounts: BTreeMap<String, Address>,
    aliases: BTreeMap<String, Address>,
    contracts: ContractIndex,
    vars: BTreeMap<String, Value>,
    slots: BTreeMap<String, Value>,
    last_contract: Option<Address>,
    last_invocation: Option<Invocation>,
    allow_failures: bool,
    default_from: Address,
    output: Vec<String>,
    synthesizer: Synthesizer,
    slot_lookup: Arc<dyn SlotLookup>,
    registry: OnceCell<Arc<Vec<Fetcher>>>,
}

impl World {
    //Function: new
    //Purpose: Bind account names to the transport's accounts and parse aliases
    //Inputs: transport, settings
    //Returns: ScenarioResult<World>
    pub fn new(transport: Arc<dyn Transport>, settings: Settings) -> ScenarioResult<Self> {
        let unlocked = transport.accounts();
        if unlocked.len() < settings.accounts.len() {
            warn!(
                named = settings.accounts.len(),
                unlocked = unlocked.len(),
                "fewer unlocked accounts than account names"
            );
        }
        let accounts: BTreeMap<String, Address> = settings
            .accounts
            .iter()
            .cloned()
            .zip(unlocked.iter().copied())
            .collect();

        let mut aliases = BTreeMap::new();
        for (name, text) in &settings.aliases {
            let address = Address::parse(text).map_err(|err| {
                ScenarioError::invalid(format!("alias `{name}`: {err}"))
            })?;
            aliases.insert(name.clone(), address);
        }

        let default_from = accounts
            .get(&settings.default_from)
            .or_else(|| aliases.get(&settings.default_from))
            .copied()
            .or_else(|| unlocked.first().copied())
            .unwrap_or(Address::ZERO);

        Ok(Self {
            transport,
            settings: Arc::new(settings),
            accounts,
            aliases,
            contracts: ContractIndex::default(),
            vars: BTreeMap::new(),
            slots: BTreeMap::new(),
            last_contract: None,
            last_invocation: None,
            allow_failures: false,
            default_from,
            output: Vec::new(),
            synthesizer: Arc::new(contract::synthesize_fetchers),
            slot_lookup: Arc::new(DefaultSlots),
            registry: OnceCell::new(),
        })
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn accounts(&self) -> &BTreeMap<String, Address> {
        &self.accounts
    }

    pub fn account(&self, name: &str) -> Option<Address> {
        self.accounts.get(name).copied()
    }

    pub fn aliases(&self) -> &BTreeMap<String, Address> {
        &self.aliases
    }

    pub fn contracts(&self) -> &ContractIndex {
        &self.contracts
    }

    pub fn contract(&self, name: &str) -> Option<&ContractInstance> {
        self.contracts.get(name)
    }

    pub fn var(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }

    pub fn last_contract(&self) -> Option<Address> {
        self.last_contract
    }

    pub fn last_invocation(&self) -> Option<&Invocation> {
        self.last_invocation.as_ref()
    }

    pub fn allow_failures(&self) -> bool {
        self.allow_failures
    }

    pub fn default_from(&self) -> Address {
        self.default_from
    }

    /// Lines produced by `Print`, `Read` and `Inspect`, oldest first.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Name lookup order: aliases, accounts, contracts.
    pub fn lookup_address(&self, name: &str) -> Option<Address> {
        self.aliases
            .get(name)
            .or_else(|| self.accounts.get(name))
            .copied()
            .or_else(|| self.contracts.get(name).map(|instance| instance.address))
    }

    pub fn implicit(&self, slot: &str) -> Option<Value> {
        self.slot_lookup.lookup(self, slot)
    }

    //=====================================================
    // Section 2.1 - Snapshot updates
    //=====================================================

    pub fn with_alias(mut self, name: &str, address: Address) -> Self {
        self.aliases.insert(name.to_string(), address);
        self
    }

    pub fn with_var(mut self, key: &str, value: Value) -> Self {
        self.vars.insert(key.to_string(), value);
        self
    }

    pub fn with_slot(mut self, slot: &str, value: Value) -> Self {
        self.slots.insert(slot.to_string(), value);
        self
    }

    /// Register a deployed instance. The fetcher registry is rebuilt on the
    /// next resolution so the new name is addressable immediately.
    pub fn with_contract(mut self, name: &str, artifact: &str, address: Address) -> Self {
        let instance = self.contracts.insert(name, artifact, address);
        debug!(name = %instance.name, artifact = %instance.artifact, %address, "contract registered");
        self.last_contract = Some(address);
        self.registry = OnceCell::new();
        self
    }

    /// Record an invocation. Arming `AllowFailures` only covers one call.
    pub fn with_invocation(mut self, invocation: Invocation) -> Self {
        self.last_invocation = Some(invocation);
        self.allow_failures = false;
        self
    }

    pub fn with_allow_failures(mut self, allow: bool) -> Self {
        self.allow_failures = allow;
        self
    }

    pub fn with_default_from(mut self, from: Address) -> Self {
        self.default_from = from;
        self
    }

    pub fn with_output(mut self, line: impl Into<String>) -> Self {
        self.output.push(line.into());
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self.registry = OnceCell::new();
        self
    }

    pub fn with_slot_lookup(mut self, lookup: Arc<dyn SlotLookup>) -> Self {
        self.slot_lookup = lookup;
        self
    }

    //Function: settle
    //Purpose: Fold a send/deploy outcome into the world
    //Inputs: invocation
    //Returns: the next world, or a fatal Transport error when failures are not allowed
    pub fn settle(self, invocation: Invocation) -> ScenarioResult<Self> {
        match &invocation.outcome {
            Ok(receipt) => {
                debug!(contract = %invocation.target, method = %invocation.method, tx = %receipt.tx_hash, "invocation succeeded");
                Ok(self.with_invocation(invocation))
            }
            Err(err) if self.allow_failures => {
                warn!(contract = %invocation.target, method = %invocation.method, error = %err, "invocation failed (allowed)");
                Ok(self.with_invocation(invocation))
            }
            Err(err) => Err(ScenarioError::Transport(err.clone())),
        }
    }

    //=====================================================
    // Section 2.2 - Registry cache
    //=====================================================

    /// Cached fetcher registry, built with `build` on first use.
    pub fn registry<B>(&self, build: B) -> Arc<Vec<Fetcher>>
    where
        B: FnOnce(&World) -> Vec<Fetcher>,
    {
        self.registry
            .get_or_init(|| {
                let fetchers = build(self);
                debug!(count = fetchers.len(), "fetcher registry built");
                Arc::new(fetchers)
            })
            .clone()
    }

    pub fn registry_is_built(&self) -> bool {
        self.registry.get().is_some()
    }

    /// Per-instance fetchers from the synthesis hook.
    pub fn synthesize(&self, name: &str) -> Vec<Fetcher> {
        (self.synthesizer)(self, name)
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("accounts", &self.accounts)
            .field("aliases", &self.aliases)
            .field("contracts", &self.contracts)
            .field("vars", &self.vars)
            .field("last_contract", &self.last_contract)
            .field("last_invocation", &self.last_invocation)
            .field("allow_failures", &self.allow_failures)
            .field("registry_built", &self.registry_is_built())
            .finish()
    }
}


//=====================================================
// End of file
//=====================================================
