use crate::prelude::*;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// The sampler to describe.
    #[arg(long, value_enum)]
    pub sampler: SamplerKind,

    /// Print the parameters as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
