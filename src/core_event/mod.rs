//=====================================================
// File: core_event/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Core scenario commands
// Objective: Dispatch one scenario line as a command and produce the next world
//=====================================================

mod assertion;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::contract;
use crate::core_value::{get_address_v, get_core_value, get_event_v, get_string_v};
use crate::dispatch::{self, Arg, Command};
use crate::event::Event;
use crate::interpreter::{ScenarioError, ScenarioResult};
use crate::value::{Address, Value};
use crate::world::{Invocation, World};

static CORE_COMMANDS: Lazy<Vec<Command>> = Lazy::new(core_commands);

//Function: process_core_event
//Purpose: Run one command line on behalf of `from`
//Inputs: world (consumed), event, from
//Returns: the next world
pub fn process_core_event(world: World, event: &Event, from: &Address) -> ScenarioResult<World> {
    let commands = command_registry(&world);
    debug!(event = %event, %from, "processing command");
    dispatch::process_command_event("Command", &commands, world, event, from)
}

/// Core commands followed by one namespace per known contract.
pub fn command_registry(world: &World) -> Vec<Command> {
    let mut commands = CORE_COMMANDS.to_vec();
    for name in world.contracts().names() {
        commands.extend(contract::synthesize_commands(world, &name));
    }
    commands
}

fn deploy(
    world: World,
    from: &Address,
    name: &str,
    artifact: &str,
    args: &[Value],
) -> ScenarioResult<World> {
    let outcome = world.transport().deploy(artifact, args, from);
    let receipt = match outcome {
        Ok(receipt) => receipt,
        Err(err) => {
            return world.settle(Invocation {
                target: name.to_string(),
                method: "deploy".to_string(),
                outcome: Err(err),
            });
        }
    };
    let Some(address) = receipt.contract_address else {
        return Err(ScenarioError::invalid(format!(
            "deploy of `{name}` returned no contract address"
        )));
    };
    info!(contract = name, artifact, %address, "deployed");
    Ok(world
        .with_contract(name, artifact, address)
        .with_invocation(Invocation {
            target: name.to_string(),
            method: "deploy".to_string(),
            outcome: Ok(receipt),
        }))
}

fn inspect(world: &World) -> String {
    let contracts: Vec<String> = world
        .contracts()
        .iter()
        .map(|instance| format!("{}={}@{}", instance.name, instance.artifact, instance.address))
        .collect();
    let vars: Vec<String> = world
        .vars()
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!(
        "accounts: {}; contracts: [{}]; vars: [{}]; allow_failures: {}",
        world.accounts().len(),
        contracts.join(", "),
        vars.join(", "),
        world.allow_failures()
    )
}

pub fn core_commands() -> Vec<Command> {
    vec![
        Command::new(
            "Print",
            vec![Arg::new("message", get_core_value)],
            |world, _, args| {
                let message = args.value("message")?.to_string();
                info!(target: "scenario::print", "{message}");
                Ok(world.with_output(message))
            },
        )
        .describe("Print a message"),
        Command::new(
            "Read",
            vec![Arg::new("expr", get_event_v)],
            |world, _, args| {
                let expr = args.event("expr")?;
                let value = get_core_value(&world, expr)?;
                info!(target: "scenario::print", "{expr} => {value}");
                Ok(world.with_output(format!("{expr} => {value}")))
            },
        )
        .describe("Resolve an expression and print its value"),
        Command::new(
            "Alias",
            vec![
                Arg::new("name", get_string_v),
                Arg::new("address", get_address_v),
            ],
            |world, _, args| Ok(world.with_alias(args.string("name")?, args.address("address")?)),
        )
        .describe("Name an address"),
        Command::new(
            "Set",
            vec![
                Arg::new("key", get_string_v),
                Arg::new("value", get_core_value),
            ],
            |world, _, args| {
                let value = args.value("value")?.clone();
                Ok(world.with_var(args.string("key")?, value))
            },
        )
        .describe("Store a value for `Var`"),
        Command::new(
            "Deploy",
            vec![
                Arg::new("name", get_string_v),
                Arg::new("artifact", get_string_v).nullable(),
                Arg::new("args", get_core_value).variadic().mapped(),
            ],
            |world, from, args| {
                let name = args.string("name")?;
                let artifact = args.value("artifact")?.as_str().unwrap_or(name);
                deploy(world, from, name, artifact, args.list("args")?)
            },
        )
        .describe("Deploy a contract instance, e.g. `(Deploy cDAI CToken)`"),
        Command::new("AllowFailures", vec![], |world, _, _| {
            Ok(world.with_allow_failures(true))
        })
        .describe("Let the next invocation fail without halting"),
        Command::new(
            "From",
            vec![
                Arg::new("actor", get_address_v),
                Arg::new("event", get_event_v),
            ],
            |world, _, args| {
                let actor = args.address("actor")?;
                process_core_event(world, args.event("event")?, &actor)
            },
        )
        .describe("Run a command as another account"),
        Command::new("Inspect", vec![], |world, _, _| {
            let summary = inspect(&world);
            info!(target: "scenario::print", "{summary}");
            Ok(world.with_output(summary))
        })
        .describe("Print a summary of the world"),
        assertion::assert_command(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::contract::{MemoryChain, Transport};
    use crate::parser::parse_event;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryChain>, World) {
        let chain = Arc::new(MemoryChain::new(5, 7));
        let world = World::new(chain.clone(), Settings::default()).unwrap();
        (chain, world)
    }

    fn run(world: World, line: &str) -> ScenarioResult<World> {
        let from = world.default_from();
        process_core_event(world, &parse_event(line).unwrap(), &from)
    }

    #[test]
    fn set_print_and_inspect_record_output() {
        let (_, world) = setup();
        let world = run(world, "Set answer 42").unwrap();
        let world = run(world, "Print (Var answer)").unwrap();
        let world = run(world, "Read (Add (Var answer) 1)").unwrap();
        let world = run(world, "Inspect").unwrap();
        assert_eq!(world.output()[0], "42");
        assert_eq!(world.output()[1], "(Add (Var answer) 1) => 43");
        assert!(world.output()[2].contains("answer=42"));
    }

    #[test]
    fn deploy_then_send_through_contract_namespace() {
        let (chain, world) = setup();
        let world = run(world, "Deploy Token Erc20").unwrap();
        let token = world.contract("Token").unwrap().address;
        assert_eq!(chain.artifact_at(&token).as_deref(), Some("Erc20"));

        let world = run(world, "From Geoff (Token transfer Torrey 10)").unwrap();
        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "transfer");
        assert_eq!(sent[0].from, world.account("Geoff").unwrap());
        assert_eq!(sent[0].args, vec![
            world.account("Torrey").unwrap().to_string(),
            "10".to_string()
        ]);
        run(world, "Assert Success").unwrap();
    }

    #[test]
    fn allowed_failures_can_be_asserted() {
        let (chain, world) = setup();
        chain.revert_on("mint", "paused");
        let world = run(world, "Deploy Token Erc20").unwrap();

        let err = run(world.clone(), "Token mint 5").unwrap_err();
        assert!(matches!(err, ScenarioError::Transport(_)));

        let world = run(world, "AllowFailures").unwrap();
        let world = run(world, "Token mint 5").unwrap();
        assert!(run(world.clone(), "Assert Revert paused").is_ok());
        assert!(run(world.clone(), "Assert Revert").is_ok());
        assert!(matches!(
            run(world.clone(), "Assert Revert other"),
            Err(ScenarioError::Assertion(_))
        ));
        assert!(matches!(
            run(world, "Assert Success"),
            Err(ScenarioError::Assertion(_))
        ));
    }

    #[test]
    fn assertions_compare_and_order() {
        let (_, world) = setup();
        assert!(run(world.clone(), "Assert Equal (Exp 1) 1e18").is_ok());
        assert!(run(world.clone(), "Assert True (Equal 1.0 1.00)").is_ok());
        assert!(run(world.clone(), "Assert LessThan 1 2").is_ok());
        assert!(matches!(
            run(world.clone(), "Assert GreaterThan 1 2"),
            Err(ScenarioError::Assertion(_))
        ));
        assert!(matches!(
            run(world, "Assert LessThan Geoff 2"),
            Err(ScenarioError::Ordering { .. })
        ));
    }

    #[test]
    fn assert_equal_rejects_a_truncated_list() {
        let (_, world) = setup();
        assert!(run(world.clone(), "Assert Equal (List 1 2) (List 1.0 2)").is_ok());
        assert!(matches!(
            run(world.clone(), "Assert Equal (List 1 2) (List 1)"),
            Err(ScenarioError::Assertion(_))
        ));
        assert!(matches!(
            run(world, "Assert Equal (List 1) (List 1 2)"),
            Err(ScenarioError::Assertion(_))
        ));
    }

    #[test]
    fn alias_binds_names_for_address_lookup() {
        let (chain, world) = setup();
        let target = chain.accounts()[3];
        let world = run(world, &format!("Alias Treasury {target}")).unwrap();
        assert_eq!(world.lookup_address("Treasury"), Some(target));
    }
}

//=====================================================
// End of file
//=====================================================
