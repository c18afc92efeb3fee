mod support;

use scenario::core_value::{get_bool_v, get_core_value, get_number_v, get_string_v};
use scenario::dispatch::{Arg, Fetcher, get_fetcher_value};
use scenario::interpreter::{BindingFailure, ScenarioError};
use scenario::value::{Number, Value};
use scenario::{Event, ScenarioResult};

use support::{event, world};

fn echo(_: &scenario::World, event: &Event) -> ScenarioResult<Value> {
    Ok(Value::Event(event.clone()))
}

#[test]
fn partial_bind_on_named_handler_falls_through() {
    let fetchers = vec![
        Fetcher::new("Foo", vec![Arg::new("a", echo), Arg::new("b", echo)], |_, _| {
            Ok(Value::string("H1"))
        }),
        Fetcher::catch_all("H2", vec![Arg::new("rest", echo).variadic()], |_, _| {
            Ok(Value::string("H2"))
        }),
    ];
    let value = get_fetcher_value("Test", &fetchers, &world(), &event("(Foo x)")).unwrap();
    assert_eq!(value.as_str(), Some("H2"));

    let value = get_fetcher_value("Test", &fetchers, &world(), &event("(foo x y)")).unwrap();
    assert_eq!(value.as_str(), Some("H1"));
}

#[test]
fn variadic_mapped_resolves_each_element() {
    let fetchers = vec![Fetcher::new(
        "Sum",
        vec![Arg::new("xs", get_number_v).variadic().mapped()],
        |_, args| Ok(Value::List(args.list("xs")?.to_vec())),
    )];
    let value = get_fetcher_value("Test", &fetchers, &world(), &event("(Sum 1 2 3)")).unwrap();
    let items = value.as_list().unwrap();
    assert_eq!(items.len(), 3);
    for (index, item) in items.iter().enumerate() {
        assert_eq!(item.as_number(), Some(&Number::from_integer(index as i64 + 1)));
    }
}

#[test]
fn variadic_mapped_reports_the_failing_element() {
    let fetchers = vec![Fetcher::new(
        "Flags",
        vec![Arg::new("xs", get_bool_v).variadic().mapped()],
        |_, args| Ok(Value::List(args.list("xs")?.to_vec())),
    )];
    let ok = get_fetcher_value("Test", &fetchers, &world(), &event("(Flags true false)")).unwrap();
    assert_eq!(ok.as_list().map(<[Value]>::len), Some(2));

    match get_fetcher_value("Test", &fetchers, &world(), &event("(Flags true 1)")) {
        Err(ScenarioError::NoMatch { attempted, .. }) => {
            assert_eq!(attempted.len(), 1);
            assert!(
                attempted[0].reason.contains("element 1"),
                "unexpected reason {}",
                attempted[0].reason
            );
        }
        other => panic!("expected NoMatch, found {other:?}"),
    }
}

#[test]
fn implicit_args_come_from_world_slots() {
    let fetchers = vec![Fetcher::new(
        "Current",
        vec![Arg::implicit("market", "Market"), Arg::new("field", get_string_v)],
        |_, args| {
            Ok(Value::string(format!(
                "{}.{}",
                args.string("market")?,
                args.string("field")?
            )))
        },
    )];
    let missing = get_fetcher_value("Test", &fetchers, &world(), &event("(Current rate)"));
    assert!(matches!(missing, Err(ScenarioError::NoMatch { .. })));

    let world = world().with_slot("Market", Value::string("cDAI"));
    let value = get_fetcher_value("Test", &fetchers, &world, &event("(Current rate)")).unwrap();
    assert_eq!(value.as_str(), Some("cDAI.rate"));
}

#[test]
fn trailing_elements_abandon_a_handler() {
    let fetchers = vec![Fetcher::new("One", vec![Arg::new("a", echo)], |_, _| {
        Ok(Value::Nothing)
    })];
    match get_fetcher_value("Test", &fetchers, &world(), &event("(One a b c)")) {
        Err(ScenarioError::NoMatch { attempted, .. }) => {
            assert!(attempted[0].reason.contains("2 unexpected trailing argument(s)"));
        }
        other => panic!("expected NoMatch, found {other:?}"),
    }
}

#[test]
fn nested_expressions_recurse_through_the_core_resolver() {
    let world = world();
    let value = get_core_value(&world, &event("(Add (Mul 2 3) (Div 1 4))")).unwrap();
    assert_eq!(value.to_string(), "6.25");

    let err = get_core_value(&world, &event("(Div 1 0)")).unwrap_err();
    assert_eq!(err.to_string(), "cannot divide 1 by zero");
}

#[test]
fn binding_failures_are_not_fatal() {
    let failure = BindingFailure::MissingArg { arg: "a".into() };
    assert!(!ScenarioError::from(failure).is_fatal());
}
