use std::cmp::Ordering;
use std::collections::BTreeMap;

use scenario::ScenarioError;
use scenario::value::{Address, Number, Precise, Value};

fn num(text: &str) -> Value {
    Value::number(text).expect("number")
}

fn string(text: &str) -> Value {
    Value::string(text)
}

#[test]
fn numbers_compare_by_decimal_value() {
    for (left, right) in [("1.0", "1.00"), ("1e3", "1000"), ("-0.50", "-.5"), ("0", "0.000")] {
        assert!(
            num(left).compare_to(&num(right)).unwrap(),
            "{left} should equal {right}"
        );
    }
    assert!(!num("1.0").compare_to(&num("1.01")).unwrap());
    assert!(num("1.00").compare_to(&string("1")).unwrap());
    assert!(!num("1").compare_to(&string("one")).unwrap());
}

#[test]
fn addresses_ignore_letter_case_only() {
    let lower = "0xabcdef0123456789abcdef0123456789abcdef01";
    let upper = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
    let other = "0xabcdef0123456789abcdef0123456789abcdef02";
    let address = Value::Address(Address::parse(lower).unwrap());

    assert!(address.compare_to(&string(upper)).unwrap());
    assert!(string(upper).compare_to(&address).unwrap());
    assert!(!address.compare_to(&string(other)).unwrap());
    assert!(!address.compare_to(&string("Geoff")).unwrap());
}

#[test]
fn list_comparison_pads_the_shorter_side_with_nothing() {
    let a = num("1");
    let b = num("2");
    let c = num("3");

    // Extra actual elements are compared against nothing.
    let short = Value::List(vec![a.clone(), b.clone()]);
    let long = Value::List(vec![a.clone(), b.clone(), c.clone()]);
    assert!(!short.compare_to(&long).unwrap());

    // A truncated actual list fails on the element it is missing.
    let single = Value::List(vec![a.clone()]);
    let pair = Value::List(vec![a.clone(), b.clone()]);
    assert!(single.compare_to(&pair).is_ok_and(|matched| !matched));
    assert!(!pair.compare_to(&single).unwrap());
    assert!(pair.compare_to(&Value::Array(vec![num("1.0"), num("2.00")])).unwrap());

    // Anything fills a gap on either side.
    let open = Value::Array(vec![a.clone(), Value::Anything]);
    assert!(single.compare_to(&open).unwrap());
    assert!(open.compare_to(&single).unwrap());
    assert!(Value::List(vec![a, b]).compare_to(&Value::Array(vec![num("1.0"), c])).is_ok_and(|m| !m));
}

#[test]
fn precise_values_truncate_to_significant_figures() {
    let actual = num("5.1000");
    let five = Value::Precise(Precise::new(Number::parse("5.10007").unwrap(), 5));
    let six = Value::Precise(Precise::new(Number::parse("5.10007").unwrap(), 6));
    assert!(five.compare_to(&actual).unwrap());
    assert!(!six.compare_to(&actual).unwrap());
    assert!(actual.compare_to(&five).unwrap());
}

#[test]
fn sentinels_short_circuit() {
    let map = Value::Map(BTreeMap::new());
    assert!(Value::Anything.compare_to(&map).unwrap());
    assert!(map.compare_to(&Value::Anything).unwrap());
    assert!(!Value::Nothing.compare_to(&num("0")).unwrap());
    assert!(!Value::Nothing.compare_to(&Value::Nothing).unwrap());
    assert!(Value::Anything.compare_to(&Value::Nothing).unwrap());
}

#[test]
fn booleans_coerce_from_zero_one_and_words() {
    assert!(Value::Bool(true).compare_to(&num("1")).unwrap());
    assert!(Value::Bool(false).compare_to(&num("0.0")).unwrap());
    assert!(!Value::Bool(true).compare_to(&num("2")).unwrap());
    assert!(Value::Bool(false).compare_to(&string("FALSE")).unwrap());
    assert!(!Value::Bool(true).compare_to(&string("yes")).unwrap());
}

#[test]
fn unlisted_pairs_fail_loudly() {
    let address = Value::Address(Address::ZERO);
    match address.compare_to(&num("0")) {
        Err(ScenarioError::ComparisonType { left, right }) => {
            assert_eq!(left.to_string(), "AddressV");
            assert_eq!(right.to_string(), "NumberV");
        }
        other => panic!("expected ComparisonType, found {other:?}"),
    }
    let err = Value::Bool(true).compare_to(&Value::List(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "cannot compare `BoolV` to `ListV`");
}

#[test]
fn ordering_is_numeric_only() {
    assert_eq!(num("1.5").compare_order(&num("2")).unwrap(), Ordering::Less);
    let precise = Value::Precise(Precise::new(Number::parse("3").unwrap(), 1));
    assert_eq!(precise.compare_order(&num("3.0")).unwrap(), Ordering::Equal);
    assert!(matches!(
        string("a").compare_order(&string("b")),
        Err(ScenarioError::Ordering { .. })
    ));
}

#[test]
fn truthiness_by_kind() {
    assert!(num("0.1").truthy());
    assert!(!num("0").truthy());
    assert!(!string("").truthy());
    assert!(!Value::Address(Address::ZERO).truthy());
    assert!(!Value::List(vec![]).truthy());
    assert!(Value::Anything.truthy());
    assert!(!Value::Nothing.truthy());
}

#[test]
fn display_variants() {
    let exp = Value::Number(Number::parse("2.5").unwrap().exp());
    assert_eq!(exp.to_string(), "2.5");
    let percent = Value::Number(Number::parse("12.5").unwrap().percent());
    assert_eq!(percent.to_string(), "12.5%");
    let list = Value::List(vec![num("1"), string("a"), Value::Nothing]);
    assert_eq!(list.to_string(), "[1, a, Nothing]");
}
