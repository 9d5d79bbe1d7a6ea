mod cli_args;
mod cli_error;
mod sampler_kind;

pub use cli_args::*;
pub use cli_error::*;
pub use sampler_kind::*;
