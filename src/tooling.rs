//! Tooling surface: the command-line interface over a workspace store.

pub mod cli;
