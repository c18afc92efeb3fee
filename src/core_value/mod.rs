//=====================================================
// File: core_value/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Root value resolver
// Objective: Own the static fetcher table, combine it with per-contract
//            fetchers into the world's registry and resolve any event
//=====================================================

mod getters;

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::dispatch::{self, Arg, BoundArgs, Fetcher};
use crate::event::Event;
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::{Number, Precise, Value};
use crate::world::World;

pub use getters::{
    get_address_v, get_bool_v, get_event_v, get_exp_number_v, get_number_v, get_percent_v,
    get_string_v, literal_token,
};

static CORE_FETCHERS: Lazy<Vec<Fetcher>> = Lazy::new(core_fetchers);

//=====================================================
// Section 1.0 - Entry points
//=====================================================

//Function: get_core_value
//Purpose: Resolve any event to a value through the world's registry
//Inputs: world: &World, event: &Event
//Returns: ScenarioResult<Value>
pub fn get_core_value(world: &World, event: &Event) -> ScenarioResult<Value> {
    let registry = core_registry(world);
    trace!(event = %event, "resolving core value");
    dispatch::get_fetcher_value("Core", &registry, world, event)
}

fn core_registry(world: &World) -> Arc<Vec<Fetcher>> {
    world.registry(|world| {
        build_registry(&CORE_FETCHERS, &world.contracts().names(), |name| {
            world.synthesize(name)
        })
    })
}

/// Static fetchers followed by the fetchers synthesized for each name.
pub fn build_registry<S>(static_list: &[Fetcher], names: &[String], synthesize: S) -> Vec<Fetcher>
where
    S: Fn(&str) -> Vec<Fetcher>,
{
    let mut registry = static_list.to_vec();
    for name in names {
        registry.extend(synthesize(name));
    }
    registry
}

/// Every fetcher reachable from the core registry, for help listings.
pub fn describe_fetchers(world: &World) -> Vec<(String, Option<String>)> {
    let registry = core_registry(world);
    registry
        .iter()
        .map(|fetcher| {
            (
                fetcher.usage(),
                fetcher.description().map(str::to_string),
            )
        })
        .collect()
}

//=====================================================
// Section 2.0 - Static fetchers
//=====================================================

fn constant(name: &str, value: Value, text: &str) -> Fetcher {
    Fetcher::new(name, vec![], move |_, _| Ok(value.clone())).describe(text)
}

fn arithmetic<O>(name: &str, op: O, text: &str) -> Fetcher
where
    O: Fn(&Number, &Number) -> ScenarioResult<Number> + Send + Sync + 'static,
{
    Fetcher::new(
        name,
        vec![Arg::new("a", get_number_v), Arg::new("b", get_number_v)],
        move |_, args| op(args.number("a")?, args.number("b")?).map(Value::Number),
    )
    .describe(text)
}

fn list_items(args: &BoundArgs) -> ScenarioResult<Vec<Value>> {
    Ok(args.list("items")?.to_vec())
}

pub fn core_fetchers() -> Vec<Fetcher> {
    vec![
        constant("True", Value::Bool(true), "The boolean true"),
        constant("False", Value::Bool(false), "The boolean false"),
        constant("Anything", Value::Anything, "Matches any value in assertions"),
        constant("Nothing", Value::Nothing, "The empty value"),
        Fetcher::new("Exactly", vec![Arg::new("amount", get_number_v)], |_, args| {
            Ok(Value::Number(args.number("amount")?.clone()))
        })
        .describe("A number taken as written, e.g. `(Exactly 1e18)`"),
        Fetcher::new("Exp", vec![Arg::new("amount", get_exp_number_v)], |_, args| {
            Ok(Value::Number(args.number("amount")?.clone()))
        })
        .describe("A number scaled by 1e18, e.g. `(Exp 1.5)`"),
        Fetcher::new("Percent", vec![Arg::new("amount", get_percent_v)], |_, args| {
            Ok(Value::Number(args.number("amount")?.clone()))
        })
        .describe("A percentage as a 1e18 mantissa, e.g. `(Percent 5)`"),
        Fetcher::new(
            "Precisely",
            vec![
                Arg::new("amount", get_number_v),
                Arg::new("precision", get_number_v),
            ],
            |_, args| {
                let precision = args.number("precision")?;
                let digits = precision.to_u32().filter(|digits| *digits > 0).ok_or_else(|| {
                    ScenarioError::invalid(format!("precision `{precision}` must be a positive integer"))
                })?;
                Ok(Value::Precise(Precise::new(args.number("amount")?.clone(), digits)))
            },
        )
        .describe("A number compared to the given significant figures"),
        arithmetic("Add", |a, b| Ok(a.add(b)), "Sum of two numbers"),
        arithmetic("Sub", |a, b| Ok(a.sub(b)), "Difference of two numbers"),
        arithmetic("Mul", |a, b| Ok(a.mul(b)), "Product of two numbers"),
        arithmetic("Div", |a, b| a.div(b), "Exact quotient of two numbers"),
        Fetcher::new(
            "Equal",
            vec![
                Arg::new("expected", get_core_value),
                Arg::new("actual", get_core_value),
            ],
            |_, args| {
                args.value("expected")?
                    .compare_to(args.value("actual")?)
                    .map(Value::Bool)
            },
        )
        .describe("Whether two values compare equal"),
        Fetcher::new(
            "Default",
            vec![
                Arg::new("expr", get_event_v),
                Arg::new("fallback", get_event_v),
            ],
            |world, args| match get_core_value(world, args.event("expr")?) {
                Ok(value) => Ok(value),
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => {
                    trace!(error = %err, "default falls back");
                    get_core_value(world, args.event("fallback")?)
                }
            },
        )
        .describe("Value of `expr`, or of `fallback` when `expr` cannot be resolved"),
        Fetcher::new(
            "List",
            vec![Arg::new("items", get_core_value).variadic().mapped()],
            |_, args| list_items(args).map(Value::List),
        )
        .describe("A list of values"),
        Fetcher::new(
            "Array",
            vec![Arg::new("items", get_core_value).variadic().mapped()],
            |_, args| list_items(args).map(Value::Array),
        )
        .describe("An ordered array of values"),
        Fetcher::new("Address", vec![Arg::new("who", get_address_v)], |_, args| {
            Ok(Value::Address(args.address("who")?))
        })
        .describe("Address of an alias, account or contract"),
        Fetcher::new("Account", vec![Arg::new("name", get_string_v)], |world, args| {
            let name = args.string("name")?;
            world
                .account(name)
                .map(Value::Address)
                .ok_or_else(|| ScenarioError::invalid(format!("unknown account `{name}`")))
        })
        .describe("Address of a named account"),
        Fetcher::new("LastContract", vec![], |world, _| {
            world
                .last_contract()
                .map(Value::Address)
                .ok_or_else(|| ScenarioError::invalid("no contract has been deployed"))
        })
        .describe("Address of the most recently deployed contract"),
        Fetcher::new("Var", vec![Arg::new("key", get_string_v)], |world, args| {
            let key = args.string("key")?;
            world
                .var(key)
                .cloned()
                .ok_or_else(|| ScenarioError::invalid(format!("variable `{key}` is not set")))
        })
        .describe("A value stored with `Set`"),
        Fetcher::new(
            "Call",
            vec![
                Arg::new("address", get_address_v),
                Arg::new("method", get_string_v),
                Arg::new("args", get_core_value).variadic().mapped(),
            ],
            |world, args| {
                let raw = world.transport().read(
                    &args.address("address")?,
                    args.string("method")?,
                    args.list("args")?,
                )?;
                Ok(Value::from_json(raw))
            },
        )
        .describe("Read a view method at an address"),
        Fetcher::catch_all("Literal", vec![Arg::new("literal", literal_token)], |_, args| {
            Ok(args.value("literal")?.clone())
        })
        .describe("A number, hex address or string literal"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::contract::MemoryChain;
    use crate::parser::parse_event;
    use crate::value::Address;
    use std::sync::Arc;

    fn world() -> World {
        World::new(Arc::new(MemoryChain::new(11, 7)), Settings::default()).unwrap()
    }

    fn eval(world: &World, source: &str) -> ScenarioResult<Value> {
        get_core_value(world, &parse_event(source).unwrap())
    }

    #[test]
    fn registry_is_static_plus_synthesized() {
        let fetchers = vec![Fetcher::new("A", vec![], |_, _| Ok(Value::Nothing))];
        let names = vec!["X".to_string(), "Y".to_string()];
        let registry = build_registry(&fetchers, &names, |name| {
            vec![Fetcher::new(name, vec![], |_, _| Ok(Value::Nothing))]
        });
        let labels: Vec<&str> = registry.iter().map(Fetcher::label).collect();
        assert_eq!(labels, vec!["A", "X", "Y"]);
    }

    #[test]
    fn simple_literal_error_wins_on_double_failure() {
        let world = world();
        let err = get_address_v(&world, &Event::token("Nobody")).unwrap_err();
        assert_eq!(err.to_string(), "unknown address `Nobody`");

        let err = get_number_v(&world, &Event::token("abc")).unwrap_err();
        assert_eq!(err.to_string(), "`abc` is not a number");
    }

    #[test]
    fn complex_path_used_when_literal_fails() {
        let world = world();
        let value = get_number_v(&world, &parse_event("(Add 1 2)").unwrap()).unwrap();
        assert_eq!(value.as_number(), Some(&Number::from_integer(3)));
        let value = get_bool_v(&world, &Event::token("TRUE")).unwrap();
        assert_eq!(value.as_bool(), Some(true));
    }

    #[test]
    fn default_falls_back_on_unresolvable_expressions() {
        let world = world();
        let value = eval(&world, "(Default (Var missing) 7)").unwrap();
        assert_eq!(value.as_number(), Some(&Number::from_integer(7)));
    }

    #[test]
    fn help_listing_and_resolution_share_one_registry() {
        let world = world().with_contract("Token", "Erc20", Address::from_bytes([4; 20]));
        assert!(!world.registry_is_built());
        let listing = describe_fetchers(&world);
        assert!(world.registry_is_built());
        assert!(listing.iter().any(|(usage, _)| usage.starts_with("Token")));
        let value = eval(&world, "(Token Address)").unwrap();
        assert_eq!(value.as_address(), Some(Address::from_bytes([4; 20])));
    }

    #[test]
    fn out_of_range_exponents_stay_strings() {
        let world = world();
        let value = eval(&world, "1e-9223372036854775808").unwrap();
        assert_eq!(value.as_str(), Some("1e-9223372036854775808"));
        assert!(get_number_v(&world, &Event::token("1.5e-9223372036854775808")).is_err());
    }

    #[test]
    fn precisely_requires_positive_integer_precision() {
        let world = world();
        assert!(matches!(eval(&world, "(Precisely 5.1 3)"), Ok(Value::Precise(_))));
        assert!(eval(&world, "(Precisely 5.1 0)").is_err());
    }
}

//=====================================================
// End of file
//=====================================================
