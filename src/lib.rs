//! Reggen - registry code generator for decorated TypeScript classes
//!
//! Reggen scans a TypeScript project for classes marked with a register
//! decorator (`@Register("Inventory")`), groups them by registry name, checks
//! that every class in a registry shares one base type, and writes one
//! `<Registry>.gen.ts` file per registry exposing a `Map` from class name to a
//! default-constructed instance.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Generation engine (extraction, collection, emission)

pub mod cli;
pub mod config;
pub mod core;
