//=====================================================
// File: dispatch/arg.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Argument descriptors and bound argument sets
// Objective: Describe how a handler consumes sub-events and expose the
//            resolved values to effect functions with typed accessors
//=====================================================

use std::fmt;
use std::sync::Arc;

use crate::event::Event;
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::{Address, Number, Value, ValueKind};
use crate::world::World;

/// Resolves one sub-event to a value. Usually re-enters the core resolver.
pub type Resolver = Arc<dyn Fn(&World, &Event) -> ScenarioResult<Value> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum ArgSource {
    Event(Resolver),
    Slot(String),
}

//=====================================================
// Section 1.0 - Arg descriptors
//=====================================================

#[derive(Clone)]
pub struct Arg {
    pub(crate) name: String,
    pub(crate) source: ArgSource,
    pub(crate) variadic: bool,
    pub(crate) mapped: bool,
    pub(crate) default: Option<Value>,
    pub(crate) nullable: bool,
}

impl Arg {
    pub fn new<R>(name: &str, resolver: R) -> Self
    where
        R: Fn(&World, &Event) -> ScenarioResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            source: ArgSource::Event(Arc::new(resolver)),
            variadic: false,
            mapped: false,
            default: None,
            nullable: false,
        }
    }

    /// An argument read from a named context slot instead of the event.
    pub fn implicit(name: &str, slot: &str) -> Self {
        Self {
            name: name.to_string(),
            source: ArgSource::Slot(slot.to_string()),
            variadic: false,
            mapped: false,
            default: None,
            nullable: false,
        }
    }

    /// Consume every remaining sub-event.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// With `variadic`, resolve each captured sub-event on its own.
    pub fn mapped(mut self) -> Self {
        self.mapped = true;
        self
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self.source, ArgSource::Slot(_))
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Short signature used in handler listings, e.g. `<amount>`, `[reason]`,
    /// `<args>...`.
    pub fn signature(&self) -> String {
        let body = if self.default.is_some() || self.nullable {
            format!("[{}]", self.name)
        } else {
            format!("<{}>", self.name)
        };
        if self.variadic {
            format!("{body}...")
        } else {
            body
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Arg");
        debug.field("name", &self.name);
        if let ArgSource::Slot(slot) = &self.source {
            debug.field("implicit", slot);
        }
        debug
            .field("variadic", &self.variadic)
            .field("mapped", &self.mapped)
            .field("default", &self.default)
            .field("nullable", &self.nullable)
            .finish()
    }
}

//=====================================================
// Section 2.0 - Bound arguments
//=====================================================

/// Values bound to a handler's arguments, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct BoundArgs {
    entries: Vec<(String, Value)>,
}

impl BoundArgs {
    pub fn insert(&mut self, name: &str, value: Value) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Put `outer` in front of these entries; names already bound here win.
    pub fn prepend(&mut self, outer: BoundArgs) {
        let mut merged: Vec<(String, Value)> = outer
            .entries
            .into_iter()
            .filter(|(name, _)| self.get(name).is_none())
            .collect();
        merged.append(&mut self.entries);
        self.entries = merged;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn value(&self, name: &str) -> ScenarioResult<&Value> {
        self.get(name)
            .ok_or_else(|| ScenarioError::invalid(format!("argument `{name}` was not bound")))
    }

    pub fn number(&self, name: &str) -> ScenarioResult<&Number> {
        let value = self.value(name)?;
        value
            .as_number()
            .ok_or_else(|| mismatch(name, ValueKind::Number, value))
    }

    pub fn string(&self, name: &str) -> ScenarioResult<&str> {
        let value = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(name, ValueKind::String, value))
    }

    pub fn address(&self, name: &str) -> ScenarioResult<Address> {
        let value = self.value(name)?;
        value
            .as_address()
            .ok_or_else(|| mismatch(name, ValueKind::Address, value))
    }

    pub fn boolean(&self, name: &str) -> ScenarioResult<bool> {
        let value = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(name, ValueKind::Bool, value))
    }

    pub fn event(&self, name: &str) -> ScenarioResult<&Event> {
        let value = self.value(name)?;
        value
            .as_event()
            .ok_or_else(|| mismatch(name, ValueKind::Event, value))
    }

    pub fn list(&self, name: &str) -> ScenarioResult<&[Value]> {
        let value = self.value(name)?;
        value
            .as_list()
            .ok_or_else(|| mismatch(name, ValueKind::List, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(name: &str, expected: ValueKind, found: &Value) -> ScenarioError {
    ScenarioError::invalid(format!(
        "argument `{name}` is {}, expected {expected}",
        found.kind()
    ))
}


//=====================================================
// End of file
//=====================================================
