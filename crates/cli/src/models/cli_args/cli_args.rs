use crate::prelude::*;
use clap::{Parser, Subcommand};

pub const BINARY_NAME: &str = "sampler";

#[derive(Debug, Parser)]
#[command(name = BINARY_NAME, about = "Drive RPC load against a ledger node with configurable samplers.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct CliArgs {
    /// Either run a test plan or list the parameters a sampler accepts.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set up a sampler and run it with concurrent virtual users.
    Run(RunArgs),
    /// Print the parameters a sampler declares.
    Describe(DescribeArgs),
}
