use crate::prelude::*;

use std::time::Duration;

/// A connection to a ledger node's RPC interface.
///
/// A channel is owned by exactly one virtual user; it is `Sync` only so that
/// borrowed channels can be held across `.await` points.
#[async_trait]
pub trait RpcChannel: Send + Sync {
    /// All identities whose display name matches `name`.
    async fn lookup_identity_by_name(&self, name: &str) -> Result<Vec<Identity>, RpcError>;

    /// The notaries on the network map, in the order the node reports them.
    async fn list_notaries(&self) -> Result<Vec<Identity>, RpcError>;

    /// Runs the remote operation and waits for its result.
    async fn invoke(&self, descriptor: &InvocationDescriptor) -> Result<Response, RpcError>;

    /// Upper bound for a single remote call on this channel.
    fn rpc_timeout(&self) -> Duration;
}

/// Opens fresh, exclusively owned [`RpcChannel`]s.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn RpcChannel>, RpcError>;

    /// Human readable target, used in logs.
    fn endpoint(&self) -> String;
}
