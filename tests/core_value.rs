mod support;

use scenario::core_event::process_core_event;
use scenario::core_value::get_core_value;
use scenario::value::{Address, Number, Value};
use scenario::{ScenarioError, World};
use serde_json::json;

use support::{chain_and_world, event, world};

fn deploy(world: World, line: &str) -> World {
    let from = world.default_from();
    process_core_event(world, &event(line), &from).expect("deploy succeeds")
}

#[test]
fn contract_names_become_addressable_after_deploy() {
    let before = world();
    match get_core_value(&before, &event("(Foo Address)")) {
        Err(ScenarioError::NoMatch { name, event, .. }) => {
            assert_eq!(name, "Foo");
            assert_eq!(event, "(Foo Address)");
        }
        other => panic!("expected NoMatch, found {other:?}"),
    }

    let after = deploy(before.clone(), "Deploy Foo");
    let value = get_core_value(&after, &event("(Foo Address)")).unwrap();
    let address = value.as_address().expect("AddressV");
    assert_eq!(Some(address), after.last_contract());
    assert_eq!(
        get_core_value(&after, &event("(Foo Artifact)")).unwrap().as_str(),
        Some("Foo")
    );

    // The earlier snapshot still does not know the contract.
    assert!(get_core_value(&before, &event("(Foo Address)")).is_err());
}

#[test]
fn registry_is_rebuilt_when_contracts_change() {
    let world = deploy(world(), "Deploy Foo");
    get_core_value(&world, &event("(Foo Address)")).unwrap();
    assert!(world.registry_is_built());

    let world = deploy(world, "Deploy Bar Token");
    assert!(!world.registry_is_built());
    assert!(get_core_value(&world, &event("(Bar Address)")).is_ok());
    assert!(get_core_value(&world, &event("(Foo Address)")).is_ok());
}

#[test]
fn view_calls_read_through_the_transport() {
    let (chain, world) = chain_and_world();
    let world = deploy(world, "Deploy Token Erc20");
    let token = world.contract("Token").unwrap().address;
    chain.stub_read(token, "totalSupply", json!("1000000000000000000000"));
    chain.stub_read(token, "name", json!("Dai"));

    let supply = get_core_value(&world, &event("(Token totalSupply)")).unwrap();
    assert!(supply.compare_to(&get_core_value(&world, &event("(Exp 1000)")).unwrap()).unwrap());
    let name = get_core_value(&world, &event("(Token name)")).unwrap();
    assert_eq!(name.as_str(), Some("Dai"));

    let called = get_core_value(&world, &event(&format!("(Call {token} name)"))).unwrap();
    assert_eq!(called.as_str(), Some("Dai"));

    // Reads with no stubbed result revert, which is fatal.
    assert!(matches!(
        get_core_value(&world, &event("(Token decimals)")),
        Err(ScenarioError::Transport(_))
    ));
}

#[test]
fn static_fetchers_cover_literals_and_arithmetic() {
    let world = world();
    let eval = |source: &str| get_core_value(&world, &event(source)).unwrap();

    assert_eq!(eval("True").as_bool(), Some(true));
    assert_eq!(eval("(Equal 1.0 1.00)").as_bool(), Some(true));
    assert_eq!(eval("(Exp 1.5)").as_number().unwrap().to_plain_string(), "1500000000000000000");
    assert_eq!(eval("(Percent 5)").to_string(), "5%");
    assert_eq!(eval("(Sub 1 3)").as_number(), Some(&Number::from_integer(-2)));
    assert!(matches!(eval("(Precisely 5.10007 5)"), Value::Precise(_)));
    assert!(matches!(eval("(List 1 Geoff)"), Value::List(items) if items.len() == 2));
    assert!(matches!(eval("(Array)"), Value::Array(items) if items.is_empty()));
    assert_eq!(eval("(Address Zero)").as_address(), Some(Address::ZERO));
    assert_eq!(eval("(Account Geoff)").as_address(), world.account("Geoff"));
    assert_eq!(eval("Geoff").as_address(), world.account("Geoff"));
    assert_eq!(eval("\"hello world\"").as_str(), Some("hello world"));
    assert!(eval("Anything").compare_to(&Value::Nothing).unwrap());
}

#[test]
fn fatal_comparison_errors_escape_nested_resolution() {
    let world = world();
    let err = get_core_value(&world, &event("(Equal (Address Zero) (List 1))")).unwrap_err();
    assert!(matches!(err, ScenarioError::ComparisonType { .. }));
}
