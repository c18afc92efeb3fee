mod support;

use std::fs;
use std::sync::Arc;

use scenario::config::Settings;
use scenario::contract::MemoryChain;
use scenario::interpreter::ErrorCode;
use scenario::{World, run_script};

use support::world;

const SCRIPT: &str = r#"
-- deploy and exercise a token
Deploy Token Erc20
Set supply (Exp 100)
Print "deployed"
From Geoff (Token transfer Torrey (Var supply))
Assert Success
Assert Equal (Var supply) 100e18

# failure below halts the run
Assert Equal 1 2
Set never 1
"#;

#[test]
fn halts_at_first_failure_without_rollback() {
    let outcome = run_script(world(), SCRIPT);
    assert!(!outcome.succeeded());
    assert_eq!(outcome.executed, 6);

    let failure = outcome.failure.as_ref().unwrap();
    assert_eq!(failure.line, 11);
    assert_eq!(failure.event, "(Assert Equal 1 2)");
    assert_eq!(failure.error.code(), ErrorCode::Assertion);
    assert!(failure.to_string().contains("[E006]"));

    assert!(outcome.world.contract("Token").is_some());
    assert!(outcome.world.var("supply").is_some());
    assert!(outcome.world.var("never").is_none());
    assert_eq!(outcome.world.output(), ["deployed".to_string()]);
}

#[test]
fn syntax_errors_stop_the_run_at_their_line() {
    let outcome = run_script(world(), "Set a 1\nSet b (Add 1\nSet c 3\n");
    let failure = outcome.failure.unwrap();
    assert_eq!(failure.line, 2);
    assert_eq!(failure.error.code(), ErrorCode::Syntax);
    assert_eq!(outcome.executed, 1);
    assert!(outcome.world.var("a").is_some());
}

#[test]
fn settings_file_drives_accounts_and_actor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "default_from = \"Ops\"\naccounts = [\"Ops\", \"Treasury\"]\nchain_seed = 4\n\n[aliases]\nBurn = \"0x000000000000000000000000000000000000dEaD\"\n",
    )
    .unwrap();
    let settings = Settings::load(&path).unwrap();

    let chain = Arc::new(MemoryChain::new(settings.chain_seed, settings.accounts.len()));
    let world = World::new(chain.clone(), settings).unwrap();
    assert_eq!(world.default_from(), world.account("Ops").unwrap());

    let outcome = run_script(world, "Deploy Vault\nVault sweep Burn\nAssert Equal (Address Burn) \"0x000000000000000000000000000000000000DEAD\"\n");
    assert!(outcome.succeeded(), "{:?}", outcome.failure);
    let sent = chain.sent();
    assert_eq!(sent[0].from, outcome.world.account("Ops").unwrap());
    assert_eq!(sent[0].args, vec!["0x000000000000000000000000000000000000dEaD".to_string()]);
}
