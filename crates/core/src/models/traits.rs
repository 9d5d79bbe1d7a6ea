mod rpc_channel;
mod sample_sink;
mod sampler;

pub use rpc_channel::*;
pub use sample_sink::*;
pub use sampler::*;
