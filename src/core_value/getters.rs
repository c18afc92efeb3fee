//=====================================================
// File: core_value/getters.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Typed argument resolvers
// Objective: Read a token literally when possible and fall back to full
//            expression evaluation, keeping the literal error on double failure
//=====================================================

use tracing::trace;

use super::get_core_value;
use crate::event::Event;
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::{Address, Number, Value, ValueKind};
use crate::world::World;

//Function: map_value
//Purpose: Simple-then-complex resolution shared by every typed getter
//Inputs: world, event, simple (token parser), expected kind
//Returns: the literal value, or the evaluated value when it has the expected kind
//Notes: a token that fails both paths reports the literal error; a sequence
//       has no literal reading, so its evaluation error is reported as is
fn map_value<S>(
    world: &World,
    event: &Event,
    simple: S,
    expected: ValueKind,
) -> ScenarioResult<Value>
where
    S: FnOnce(&str) -> ScenarioResult<Value>,
{
    let simple_err = match event {
        Event::Token(text) => match simple(text) {
            Ok(value) => return Ok(value),
            Err(err) => Some(err),
        },
        Event::Seq(_) => None,
    };

    let evaluated = match get_core_value(world, event) {
        Ok(value) if value.kind() == expected => return Ok(value),
        Ok(value) => ScenarioError::invalid(format!(
            "expected {expected} from `{event}`, found {} `{value}`",
            value.kind()
        )),
        Err(err) if err.is_fatal() => return Err(err),
        Err(err) => err,
    };

    match simple_err {
        Some(err) => {
            trace!(event = %event, complex = %evaluated, "reporting literal error");
            Err(err)
        }
        None => Err(evaluated),
    }
}

pub fn get_string_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(world, event, |text| Ok(Value::string(text)), ValueKind::String)
}

pub fn get_bool_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(
        world,
        event,
        |text| match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ScenarioError::invalid(format!("`{text}` is not a boolean"))),
        },
        ValueKind::Bool,
    )
}

pub fn get_number_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(world, event, |text| Value::number(text), ValueKind::Number)
}

/// `1.5` reads as `1.5e18`.
pub fn get_exp_number_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(
        world,
        event,
        |text| Number::parse(text).map(|number| Value::Number(number.exp())),
        ValueKind::Number,
    )
}

/// `5` reads as `5%` of a 1e18 mantissa.
pub fn get_percent_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(
        world,
        event,
        |text| {
            let digits = text.strip_suffix('%').unwrap_or(text);
            Number::parse(digits).map(|number| Value::Number(number.percent()))
        },
        ValueKind::Number,
    )
}

/// Hex literal or a known alias/account/contract name.
pub fn get_address_v(world: &World, event: &Event) -> ScenarioResult<Value> {
    map_value(
        world,
        event,
        |text| {
            if Address::looks_like(text) {
                return Address::parse(text).map(Value::Address);
            }
            world
                .lookup_address(text)
                .map(Value::Address)
                .ok_or_else(|| ScenarioError::invalid(format!("unknown address `{text}`")))
        },
        ValueKind::Address,
    )
}

/// The event itself, unevaluated.
pub fn get_event_v(_world: &World, event: &Event) -> ScenarioResult<Value> {
    Ok(Value::Event(event.clone()))
}

/// Resolver for the `Literal` catch-all: number, hex address, known name,
/// else the token text. Never re-enters the registry.
pub fn literal_token(world: &World, event: &Event) -> ScenarioResult<Value> {
    let Some(text) = event.as_token() else {
        return Err(ScenarioError::invalid(format!("`{event}` is not a literal")));
    };
    if let Ok(number) = Number::parse(text) {
        return Ok(Value::Number(number));
    }
    if let Ok(address) = Address::parse(text) {
        return Ok(Value::Address(address));
    }
    if let Some(address) = world.lookup_address(text) {
        return Ok(Value::Address(address));
    }
    Ok(Value::string(text))
}

//=====================================================
// End of file
//=====================================================
