mod connect;
mod coordinator;
mod identity_resolver;
mod invocation_builder;
mod json_rpc;
mod sample_executor;
mod samplers;
mod setup_context;
mod test_plan;

pub use connect::*;
pub use coordinator::*;
pub use identity_resolver::*;
pub use invocation_builder::*;
pub use json_rpc::*;
pub use sample_executor::*;
pub use samplers::*;
pub use setup_context::*;
pub use test_plan::*;
