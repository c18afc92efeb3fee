//=====================================================
// File: dispatch/handler.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Fetcher and command descriptors
// Objective: One generic handler shape shared by read-only fetchers and
//            side-effecting commands, including composite namespaces
//=====================================================

use std::fmt;
use std::sync::Arc;

use super::arg::{Arg, BoundArgs};
use crate::interpreter::ScenarioResult;
use crate::value::{Address, Value};
use crate::world::World;

pub type FetchFn = Arc<dyn Fn(&World, &BoundArgs) -> ScenarioResult<Value> + Send + Sync>;
pub type CommandFn =
    Arc<dyn Fn(World, &Address, &BoundArgs) -> ScenarioResult<World> + Send + Sync>;

pub type Fetcher = Handler<FetchFn>;
pub type Command = Handler<CommandFn>;

#[derive(Clone)]
pub(crate) enum Body<F> {
    Effect(F),
    Composite(Arc<[Handler<F>]>),
}

/// A named (or catch-all) handler with its argument shape and effect.
#[derive(Clone)]
pub struct Handler<F> {
    pub(crate) name: Option<String>,
    pub(crate) label: String,
    pub(crate) description: Option<String>,
    pub(crate) args: Vec<Arg>,
    pub(crate) name_position: usize,
    pub(crate) body: Body<F>,
}

impl<F> Handler<F> {
    fn build(name: Option<String>, label: String, args: Vec<Arg>, body: Body<F>) -> Self {
        Self {
            name,
            label,
            description: None,
            args,
            name_position: 0,
            body,
        }
    }

    /// A namespace such as `(Assert Equal a b)`: the elements after the name
    /// are dispatched against `sub` with the same matching rules.
    pub fn composite(name: &str, sub: Vec<Handler<F>>) -> Self {
        Self::build(
            Some(name.to_string()),
            name.to_string(),
            Vec::new(),
            Body::Composite(sub.into()),
        )
    }

    /// Arguments a composite binds before handing the rest to its sub-list.
    /// Their values are visible to the selected sub-handler.
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Index of the element holding the handler name. Defaults to 0.
    pub fn name_position(mut self, position: usize) -> Self {
        self.name_position = position;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn is_catch_all(&self) -> bool {
        self.name.is_none()
    }

    pub fn sub_handlers(&self) -> Option<&[Handler<F>]> {
        match &self.body {
            Body::Composite(sub) => Some(sub),
            Body::Effect(_) => None,
        }
    }

    pub(crate) fn matches_name(&self, token: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(token))
    }

    /// Usage line for help output, e.g. `Assert Equal <expected> <actual>`.
    pub fn usage(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(name.clone());
        }
        parts.extend(
            self.args
                .iter()
                .filter(|arg| !arg.is_implicit())
                .map(Arg::signature),
        );
        if self.sub_handlers().is_some() {
            parts.push("...".to_string());
        }
        parts.join(" ")
    }
}

impl Handler<FetchFn> {
    pub fn new<E>(name: &str, args: Vec<Arg>, effect: E) -> Self
    where
        E: Fn(&World, &BoundArgs) -> ScenarioResult<Value> + Send + Sync + 'static,
    {
        Self::build(
            Some(name.to_string()),
            name.to_string(),
            args,
            Body::Effect(Arc::new(effect)),
        )
    }

    /// A fetcher with no name token, tried after every named fetcher.
    pub fn catch_all<E>(label: &str, args: Vec<Arg>, effect: E) -> Self
    where
        E: Fn(&World, &BoundArgs) -> ScenarioResult<Value> + Send + Sync + 'static,
    {
        Self::build(None, label.to_string(), args, Body::Effect(Arc::new(effect)))
    }
}

impl Handler<CommandFn> {
    pub fn new<E>(name: &str, args: Vec<Arg>, effect: E) -> Self
    where
        E: Fn(World, &Address, &BoundArgs) -> ScenarioResult<World> + Send + Sync + 'static,
    {
        Self::build(
            Some(name.to_string()),
            name.to_string(),
            args,
            Body::Effect(Arc::new(effect)),
        )
    }

    pub fn catch_all<E>(label: &str, args: Vec<Arg>, effect: E) -> Self
    where
        E: Fn(World, &Address, &BoundArgs) -> ScenarioResult<World> + Send + Sync + 'static,
    {
        Self::build(None, label.to_string(), args, Body::Effect(Arc::new(effect)))
    }
}

impl<F> fmt::Debug for Handler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("label", &self.label)
            .field("catch_all", &self.is_catch_all())
            .field("args", &self.args)
            .field("name_position", &self.name_position)
            .field("sub", &self.sub_handlers().map(<[Handler<F>]>::len))
            .finish()
    }
}

//=====================================================
// End of file
//=====================================================
