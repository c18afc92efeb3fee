//=====================================================
// File: devtools/repl.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Provide REPL-friendly helpers for the scenario interpreter
// Objective: Accept both commands and bare expressions on one prompt and keep
//            the world between lines
//=====================================================

use std::io::{self, BufRead, Write};

use crate::core_value::{describe_fetchers, get_core_value};
use crate::event::Event;
use crate::interpreter::{Interpreter, ScenarioError, ScenarioResult};
use crate::parser::parse_line;
use crate::value::Value;

pub const PROMPT: &str = "scenario> ";

#[derive(Debug)]
pub enum Reply {
    /// The line was an expression.
    Value(Value),
    /// The line was a command; any output it produced.
    Applied(Vec<String>),
    Help(Vec<String>),
    Empty,
}

pub const EVAL_PREFIX: &str = ":eval";

/// Evaluate one REPL line.
///
/// `:eval expr` always resolves an expression. A line headed by a known
/// contract is read as a view call first, so sending needs `From actor (...)`.
/// Anything else runs as a command, or resolves as an expression when no
/// command matches.
pub fn eval_line(interpreter: &mut Interpreter, line: &str) -> ScenarioResult<Reply> {
    let trimmed = line.trim();
    if trimmed == ":help" {
        let lines = describe_fetchers(interpreter.world())
            .into_iter()
            .map(|(usage, description)| match description {
                Some(text) => format!("{usage:<40} {text}"),
                None => usage,
            })
            .collect();
        return Ok(Reply::Help(lines));
    }
    if let Some(expr) = trimmed
        .strip_prefix(EVAL_PREFIX)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        return match parse_line(expr, 1)? {
            Some(event) => get_core_value(interpreter.world(), &event).map(Reply::Value),
            None => Ok(Reply::Empty),
        };
    }
    let Some(event) = parse_line(line, 1)? else {
        return Ok(Reply::Empty);
    };

    if names_contract(interpreter, &event) {
        match get_core_value(interpreter.world(), &event) {
            Err(ScenarioError::NoMatch { .. }) => {}
            read => return read.map(Reply::Value),
        }
    }
    let printed = interpreter.world().output().len();
    match interpreter.execute_event(&event) {
        Ok(()) => Ok(Reply::Applied(
            interpreter.world().output()[printed..].to_vec(),
        )),
        Err(ScenarioError::NoMatch { .. }) => {
            get_core_value(interpreter.world(), &event).map(Reply::Value)
        }
        Err(err) => Err(err),
    }
}

fn names_contract(interpreter: &Interpreter, event: &Event) -> bool {
    event.head().is_some_and(|head| {
        interpreter
            .world()
            .contracts()
            .names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(head))
    })
}

/// Read lines from `input` until EOF or `:quit`.
pub fn run<R: BufRead, W: Write>(
    interpreter: &mut Interpreter,
    input: R,
    mut output: W,
) -> io::Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;
        if line.trim() == ":quit" {
            break;
        }
        match eval_line(interpreter, &line) {
            Ok(Reply::Value(value)) => writeln!(output, "{value}")?,
            Ok(Reply::Applied(lines)) | Ok(Reply::Help(lines)) => {
                for text in lines {
                    writeln!(output, "{text}")?;
                }
            }
            Ok(Reply::Empty) => {}
            Err(err) => writeln!(output, "error[{}]: {err}", err.code_str())?,
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    Ok(())
}


//=====================================================
// End of file
//=====================================================
