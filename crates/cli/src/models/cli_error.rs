use crate::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum InvalidCliArgs {
    #[error("Node url invalid {bad_value}")]
    NodeUrlInvalid { bad_value: String },
    #[error("Virtual users must be positive")]
    VirtualUsersMustBePositive,
    #[error("Iterations must be positive")]
    IterationsMustBePositive,
    #[error("RPC timeout cannot be zero")]
    RpcTimeoutCannotBeZero,
    #[error("Params file {path} invalid: {underlying}")]
    ParamsFileInvalid { path: String, underlying: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid CLI arguments: {0}")]
    InvalidCliArgs(#[from] InvalidCliArgs),

    #[error("Core error: {0}")]
    CoreError(#[from] Error),

    #[error("Failed to open output {path}: {underlying}")]
    Output {
        path: String,
        underlying: std::io::Error,
    },

    #[error("Failed to render parameters: {0}")]
    Render(#[from] serde_json::Error),
}
