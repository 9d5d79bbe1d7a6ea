//! In-memory stand-ins for a ledger node, shared by the unit tests.

use crate::prelude::*;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

#[derive(Debug, Clone)]
pub(crate) enum InvokeBehavior {
    Respond(Response),
    Fail(RpcError),
    Hang,
}

type InvokeFn = dyn Fn(usize) -> InvokeBehavior + Send + Sync;

pub(crate) struct StubNetwork {
    parties: IndexMap<String, Vec<Identity>>,
    notaries: Vec<Identity>,
    invoke: Box<InvokeFn>,
    rpc_timeout: Duration,
    failing_connects: usize,
    pub(crate) lookups: AtomicUsize,
    pub(crate) notary_listings: AtomicUsize,
    pub(crate) invocations: AtomicUsize,
    pub(crate) connects: AtomicUsize,
    pub(crate) invoked: Mutex<Vec<InvocationDescriptor>>,
}

impl StubNetwork {
    pub(crate) fn new() -> Self {
        Self {
            parties: IndexMap::new(),
            notaries: Vec::new(),
            invoke: Box::new(|_| InvokeBehavior::Respond(serde_json::json!({ "ok": true }))),
            rpc_timeout: Duration::from_secs(5),
            failing_connects: 0,
            lookups: AtomicUsize::new(0),
            notary_listings: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
            connects: AtomicUsize::new(0),
            invoked: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_party(mut self, name: &str, key: &str) -> Self {
        self.parties
            .entry(name.to_owned())
            .or_default()
            .push(Identity::new(name, key));
        self
    }

    pub(crate) fn with_notary(mut self, name: &str, key: &str) -> Self {
        self.notaries.push(Identity::new(name, key));
        self.with_party(name, key)
    }

    /// `invoke` receives the zero-based index of the invocation across the network.
    pub(crate) fn with_invoke(
        mut self,
        invoke: impl Fn(usize) -> InvokeBehavior + Send + Sync + 'static,
    ) -> Self {
        self.invoke = Box::new(invoke);
        self
    }

    pub(crate) fn with_rpc_timeout(mut self, rpc_timeout: Duration) -> Self {
        self.rpc_timeout = rpc_timeout;
        self
    }

    pub(crate) fn with_failing_connects(mut self, failing_connects: usize) -> Self {
        self.failing_connects = failing_connects;
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub(crate) fn channel(network: &Arc<StubNetwork>) -> StubChannel {
    StubChannel {
        network: Arc::clone(network),
        dropped: AtomicBool::new(false),
    }
}

pub(crate) struct StubChannel {
    network: Arc<StubNetwork>,
    dropped: AtomicBool,
}

#[async_trait]
impl RpcChannel for StubChannel {
    async fn lookup_identity_by_name(&self, name: &str) -> Result<Vec<Identity>, RpcError> {
        self.network.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.network.parties.get(name).cloned().unwrap_or_default())
    }

    async fn list_notaries(&self) -> Result<Vec<Identity>, RpcError> {
        self.network.notary_listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.network.notaries.clone())
    }

    async fn invoke(&self, descriptor: &InvocationDescriptor) -> Result<Response, RpcError> {
        if self.dropped.load(Ordering::SeqCst) {
            return Err(RpcError::ConnectionLost {
                underlying: "channel already dropped".to_owned(),
            });
        }
        let index = self.network.invocations.fetch_add(1, Ordering::SeqCst);
        self.network
            .invoked
            .lock()
            .unwrap()
            .push(descriptor.clone());
        match (self.network.invoke)(index) {
            InvokeBehavior::Respond(response) => Ok(response),
            InvokeBehavior::Fail(error) => {
                if error.is_connection_loss() {
                    self.dropped.store(true, Ordering::SeqCst);
                }
                Err(error)
            }
            InvokeBehavior::Hang => std::future::pending().await,
        }
    }

    fn rpc_timeout(&self) -> Duration {
        self.network.rpc_timeout
    }
}

pub(crate) struct StubConnector {
    network: Arc<StubNetwork>,
}

impl StubConnector {
    pub(crate) fn new(network: &Arc<StubNetwork>) -> Self {
        Self {
            network: Arc::clone(network),
        }
    }
}

#[async_trait]
impl Connector for StubConnector {
    async fn connect(&self) -> Result<Box<dyn RpcChannel>, RpcError> {
        let attempt = self.network.connects.fetch_add(1, Ordering::SeqCst);
        if attempt < self.network.failing_connects {
            return Err(RpcError::ConnectionLost {
                underlying: "connection refused".to_owned(),
            });
        }
        Ok(Box::new(channel(&self.network)))
    }

    fn endpoint(&self) -> String {
        "stub://ledger".to_owned()
    }
}
