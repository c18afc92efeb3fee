//=====================================================
// File: interpreter/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Line-level scenario interpreter
// Objective: Own the current world, evaluate expressions and apply commands
//=====================================================

pub mod errors;

pub use errors::{Attempt, BindingFailure, ErrorCode, ScenarioError, ScenarioResult};

use tracing::debug;

use crate::core_event::process_core_event;
use crate::core_value::get_core_value;
use crate::event::Event;
use crate::parser::parse_event;
use crate::value::{Address, Value};
use crate::world::World;

pub struct Interpreter {
    world: World,
}

impl Interpreter {
    pub fn new(world: World) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// Resolve one expression line to a value.
    pub fn eval(&self, line: &str) -> ScenarioResult<Value> {
        let event = parse_event(line)?;
        get_core_value(&self.world, &event)
    }

    /// Run one command line as the default actor.
    pub fn execute(&mut self, line: &str) -> ScenarioResult<()> {
        let event = parse_event(line)?;
        self.execute_event(&event)
    }

    pub fn execute_event(&mut self, event: &Event) -> ScenarioResult<()> {
        let from = self.world.default_from();
        self.execute_as(event, &from)
    }

    /// On failure the world stays as it was before the line.
    pub fn execute_as(&mut self, event: &Event, from: &Address) -> ScenarioResult<()> {
        let next = process_core_event(self.world.clone(), event, from)?;
        debug!(event = %event, "line committed");
        self.world = next;
        Ok(())
    }
}


//=====================================================
// End of file
//=====================================================
