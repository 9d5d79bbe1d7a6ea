mod cli_args;
mod describe_args;
mod run_args;

pub use cli_args::*;
pub use describe_args::*;
pub use run_args::*;
