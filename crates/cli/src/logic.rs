mod describe;
mod init_logging;
mod run;
mod run_plan;

pub use describe::*;
pub use init_logging::*;
pub use run::*;
pub use run_plan::*;
