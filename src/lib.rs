//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Scenario interpreter library root
// Objective: Expose the value model, event tree, dispatcher, core resolvers
//            and runner used by the scenario CLI and embedding hosts
//=====================================================

pub mod config;
pub mod contract;
pub mod core_event;
pub mod core_value;
pub mod devtools;
pub mod dispatch;
pub mod event;
pub mod interpreter;
pub mod logging;
pub mod parser;
pub mod runner;
pub mod value;
pub mod world;

pub use config::Settings;
pub use contract::{MemoryChain, Transport};
pub use core_value::get_core_value;
pub use event::Event;
pub use interpreter::{Interpreter, ScenarioError, ScenarioResult};
pub use runner::{RunOutcome, run_script};
pub use value::Value;
pub use world::World;

//=====================================================
// End of file
//=====================================================
