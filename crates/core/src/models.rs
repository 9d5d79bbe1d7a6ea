mod error;
mod identity;
mod invocation;
mod parameter;
mod retry_policy;
mod run_parameters;
mod sample;
mod test_context;
mod traits;

pub use error::*;
pub use identity::*;
pub use invocation::*;
pub use parameter::*;
pub use retry_policy::*;
pub use run_parameters::*;
pub use sample::*;
pub use test_context::*;
pub use traits::*;
