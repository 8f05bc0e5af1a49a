//! depscope - module dependency graph and institutional hierarchy analyzer
//!
//! This crate provides two in-memory engines: a directed dependency graph
//! of software modules (cycle detection, build ordering, transitive and
//! reverse-impact queries) and a fixed-ladder institutional hierarchy tree.

pub mod export;
pub mod graph;
pub mod hierarchy;
pub mod logging;
pub mod sample;
