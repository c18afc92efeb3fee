//=====================================================
// File: core_event/assertion.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: `Assert` sub-commands
// Objective: Check values and the last invocation without changing the world
//=====================================================

use std::cmp::Ordering;

use crate::contract::TransportError;
use crate::core_value::{get_core_value, get_string_v};
use crate::dispatch::{Arg, BoundArgs, Command};
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::Value;
use crate::world::World;

fn failed(message: String) -> ScenarioError {
    ScenarioError::Assertion(message)
}

fn check_order(args: &BoundArgs, wanted: Ordering, word: &str) -> ScenarioResult<()> {
    let left = args.value("a")?;
    let right = args.value("b")?;
    if left.compare_order(right)? == wanted {
        Ok(())
    } else {
        Err(failed(format!("expected {left} to be {word} {right}")))
    }
}

fn check_truth(args: &BoundArgs, wanted: bool) -> ScenarioResult<()> {
    let value = args.value("value")?;
    if value.truthy() == wanted {
        Ok(())
    } else {
        Err(failed(format!("expected {value} to be {wanted}")))
    }
}

fn check_revert(world: &World, args: &BoundArgs) -> ScenarioResult<()> {
    let Some(invocation) = world.last_invocation() else {
        return Err(failed("expected a revert, but nothing was invoked".into()));
    };
    let expected = args.value("reason")?;
    match &invocation.outcome {
        Err(TransportError::Revert { reason }) => match expected.as_str() {
            Some(wanted) if wanted != reason => Err(failed(format!(
                "expected revert `{wanted}`, got `{reason}`"
            ))),
            _ => Ok(()),
        },
        Err(err) => Err(failed(format!("expected a revert, got {err}"))),
        Ok(_) => Err(failed(format!(
            "expected {}.{} to revert, but it succeeded",
            invocation.target, invocation.method
        ))),
    }
}

fn check_success(world: &World) -> ScenarioResult<()> {
    match world.last_invocation() {
        Some(invocation) => match &invocation.outcome {
            Ok(_) => Ok(()),
            Err(err) => Err(failed(format!(
                "expected {}.{} to succeed, got {err}",
                invocation.target, invocation.method
            ))),
        },
        None => Err(failed("expected a successful invocation, but nothing was invoked".into())),
    }
}

/// Wrap a check as a command that hands the world back unchanged.
fn check<C>(name: &str, args: Vec<Arg>, predicate: C, text: &str) -> Command
where
    C: Fn(&World, &BoundArgs) -> ScenarioResult<()> + Send + Sync + 'static,
{
    Command::new(name, args, move |world, _, bound| {
        predicate(&world, bound)?;
        Ok(world)
    })
    .describe(text)
}

pub(super) fn assert_command() -> Command {
    let pair = |first: &str, second: &str| {
        vec![
            Arg::new(first, get_core_value),
            Arg::new(second, get_core_value),
        ]
    };
    let sub = vec![
        check(
            "Equal",
            pair("expected", "actual"),
            |_, args| {
                let expected = args.value("expected")?;
                let actual = args.value("actual")?;
                if expected.compare_to(actual)? {
                    Ok(())
                } else {
                    Err(failed(describe_mismatch(expected, actual)))
                }
            },
            "Values compare equal",
        ),
        check(
            "True",
            vec![Arg::new("value", get_core_value)],
            |_, args| check_truth(args, true),
            "Value is truthy",
        ),
        check(
            "False",
            vec![Arg::new("value", get_core_value)],
            |_, args| check_truth(args, false),
            "Value is falsy",
        ),
        check(
            "LessThan",
            pair("a", "b"),
            |_, args| check_order(args, Ordering::Less, "less than"),
            "First number is smaller",
        ),
        check(
            "GreaterThan",
            pair("a", "b"),
            |_, args| check_order(args, Ordering::Greater, "greater than"),
            "First number is larger",
        ),
        check(
            "Revert",
            vec![Arg::new("reason", get_string_v).nullable()],
            check_revert,
            "Last invocation reverted, optionally with a reason",
        ),
        check(
            "Success",
            vec![],
            |world, _| check_success(world),
            "Last invocation succeeded",
        ),
    ];
    Command::composite("Assert", sub).describe("Assertions; a failure halts the scenario")
}

fn describe_mismatch(expected: &Value, actual: &Value) -> String {
    format!("expected {expected} ({}), got {actual} ({})", expected.kind(), actual.kind())
}

//=====================================================
// End of file
//=====================================================
