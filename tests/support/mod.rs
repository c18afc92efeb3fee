//=====================================================
// File: tests/support/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Shared fixtures for integration tests
// Objective: Build worlds over a seeded in-memory chain
//=====================================================

#![allow(dead_code)]

use std::sync::Arc;

use scenario::config::Settings;
use scenario::contract::MemoryChain;
use scenario::parser::parse_event;
use scenario::{Event, World};

pub fn chain_and_world() -> (Arc<MemoryChain>, World) {
    let chain = Arc::new(MemoryChain::new(17, 7));
    let world = World::new(chain.clone(), Settings::default()).expect("world");
    (chain, world)
}

pub fn world() -> World {
    chain_and_world().1
}

pub fn event(source: &str) -> Event {
    parse_event(source).expect("event parses")
}

//=====================================================
// End of file
//=====================================================
