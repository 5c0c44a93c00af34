//! Game implementations.
//!
//! - `galaxy`: the reference space-empire ruleset used by tests and demos

pub mod galaxy;
