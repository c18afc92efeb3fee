//=====================================================
// File: devtools/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Developer tooling entry points
// Objective: Group interactive helpers used by the CLI
//=====================================================

pub mod repl;

//=====================================================
// End of file
//=====================================================
