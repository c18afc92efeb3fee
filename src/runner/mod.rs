//=====================================================
// File: runner/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Scenario script runner
// Objective: Execute script lines in order and stop at the first failure,
//            keeping everything earlier lines committed
//=====================================================

use std::fmt;

use tracing::{error, info};

use crate::interpreter::{Interpreter, ScenarioError};
use crate::parser::parse_line;
use crate::world::World;

/// The line that stopped a run.
#[derive(Debug, Clone)]
pub struct LineFailure {
    pub line: usize,
    pub event: String,
    pub error: ScenarioError,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: `{}` failed [{}]: {}",
            self.line,
            self.event,
            self.error.code_str(),
            self.error
        )
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    /// World after the last successful line.
    pub world: World,
    pub executed: usize,
    pub failure: Option<LineFailure>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

//Function: run_script
//Purpose: Execute every command line of `source` against `world`
//Inputs: world, source text
//Returns: RunOutcome with the final world and the first failure, if any
pub fn run_script(world: World, source: &str) -> RunOutcome {
    let mut interpreter = Interpreter::new(world);
    let mut executed = 0;

    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let event = match parse_line(text, number) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                let failure = LineFailure {
                    line: number,
                    event: text.trim().to_string(),
                    error: err.into(),
                };
                error!(%failure, "scenario halted");
                return RunOutcome {
                    world: interpreter.into_world(),
                    executed,
                    failure: Some(failure),
                };
            }
        };

        if let Err(err) = interpreter.execute_event(&event) {
            let failure = LineFailure {
                line: number,
                event: event.to_string(),
                error: err,
            };
            error!(%failure, "scenario halted");
            return RunOutcome {
                world: interpreter.into_world(),
                executed,
                failure: Some(failure),
            };
        }
        executed += 1;
    }

    info!(executed, "scenario finished");
    RunOutcome {
        world: interpreter.into_world(),
        executed,
        failure: None,
    }
}

//=====================================================
// End of file
//=====================================================
