//! CLI for the Charon Sans build pipeline.

pub mod cli;
