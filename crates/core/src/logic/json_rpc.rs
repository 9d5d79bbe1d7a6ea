use crate::prelude::*;

use jsonrpsee_client_transport::ws::WsTransportClientBuilder;
use jsonrpsee_core::{
    client::{Client, ClientT},
    params::ArrayParams,
    ClientError,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Default upper bound for a single remote call.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);
/// Default upper bound for the websocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_BUFFER_CAPACITY_PER_SUBSCRIPTION: usize = 4096 * 1024;

mod method {
    pub const PARTIES_FROM_NAME: &str = "partiesFromName";
    pub const NOTARY_IDENTITIES: &str = "notaryIdentities";
    pub const START_FLOW_DYNAMIC: &str = "startFlowDynamic";
}

/// Opens websocket JSON-RPC connections to a node.
#[derive(Debug, Clone, Getters, Builder)]
pub struct JsonRpcConnector {
    #[getset(get = "pub")]
    url: Url,

    #[getset(get = "pub")]
    #[builder(default = DEFAULT_RPC_TIMEOUT)]
    rpc_timeout: Duration,

    #[getset(get = "pub")]
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    connect_timeout: Duration,
}

/// A websocket JSON-RPC connection owned by one virtual user.
pub struct JsonRpcChannel {
    client: Client,
    rpc_timeout: Duration,
}

#[async_trait]
impl Connector for JsonRpcConnector {
    async fn connect(&self) -> Result<Box<dyn RpcChannel>, RpcError> {
        let (sender, receiver) = WsTransportClientBuilder::default()
            .connection_timeout(self.connect_timeout)
            .build(self.url.clone())
            .await
            .map_err(|e| RpcError::ConnectionLost {
                underlying: e.to_string(),
            })?;

        let client = Client::builder()
            .request_timeout(self.rpc_timeout)
            .max_buffer_capacity_per_subscription(MAX_BUFFER_CAPACITY_PER_SUBSCRIPTION)
            .build_with_tokio(sender, receiver);

        Ok(Box::new(JsonRpcChannel {
            client,
            rpc_timeout: self.rpc_timeout,
        }))
    }

    fn endpoint(&self) -> String {
        self.url.to_string()
    }
}

impl JsonRpcChannel {
    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: ArrayParams,
    ) -> Result<R, RpcError> {
        if !self.client.is_connected() {
            return Err(RpcError::ConnectionLost {
                underlying: "websocket closed".to_owned(),
            });
        }
        self.client
            .request(method, params)
            .await
            .map_err(|e| rpc_error_from(e, self.rpc_timeout))
    }
}

fn params<T: Serialize>(values: &[T]) -> Result<ArrayParams, RpcError> {
    let mut params = ArrayParams::new();
    for value in values {
        params.insert(value).map_err(|e| RpcError::Decode {
            underlying: e.to_string(),
        })?;
    }
    Ok(params)
}

fn rpc_error_from(error: ClientError, rpc_timeout: Duration) -> RpcError {
    match error {
        ClientError::RequestTimeout => RpcError::Timeout { after: rpc_timeout },
        ClientError::Call(call) => RpcError::Remote {
            message: call.message().to_owned(),
        },
        ClientError::ParseError(e) => RpcError::Decode {
            underlying: e.to_string(),
        },
        ClientError::RestartNeeded(e) => RpcError::ConnectionLost {
            underlying: e.to_string(),
        },
        ClientError::Transport(e) => RpcError::ConnectionLost {
            underlying: e.to_string(),
        },
        other => RpcError::Remote {
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl RpcChannel for JsonRpcChannel {
    async fn lookup_identity_by_name(&self, name: &str) -> Result<Vec<Identity>, RpcError> {
        let mut params = params(&[name])?;
        params.insert(true).map_err(|e| RpcError::Decode {
            underlying: e.to_string(),
        })?;
        self.call(method::PARTIES_FROM_NAME, params).await
    }

    async fn list_notaries(&self) -> Result<Vec<Identity>, RpcError> {
        self.call(method::NOTARY_IDENTITIES, ArrayParams::new())
            .await
    }

    async fn invoke(&self, descriptor: &InvocationDescriptor) -> Result<Response, RpcError> {
        let mut params = params(&[descriptor.operation().name()])?;
        params
            .insert(descriptor.arguments())
            .map_err(|e| RpcError::Decode {
                underlying: e.to_string(),
            })?;
        self.call(method::START_FLOW_DYNAMIC, params).await
    }

    fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_maps_to_timeout() {
        let error = rpc_error_from(ClientError::RequestTimeout, Duration::from_secs(3));
        assert_eq!(
            error,
            RpcError::Timeout {
                after: Duration::from_secs(3)
            }
        );
    }

    #[test]
    fn custom_errors_are_remote_failures() {
        let error = rpc_error_from(
            ClientError::Custom("flow hospitalised".to_owned()),
            DEFAULT_RPC_TIMEOUT,
        );
        assert!(matches!(error, RpcError::Remote { message } if message.contains("hospitalised")));
    }

    #[test]
    fn connector_defaults() {
        let connector = JsonRpcConnector::builder()
            .url(Url::parse("ws://127.0.0.1:10005").unwrap())
            .build();
        assert_eq!(*connector.rpc_timeout(), DEFAULT_RPC_TIMEOUT);
        assert_eq!(connector.endpoint(), "ws://127.0.0.1:10005/");
    }

    #[test]
    fn invocation_params_carry_operation_and_typed_arguments() {
        const OP: OperationHandle = OperationHandle::new("test.Op", &[ArgKind::Int]);
        let descriptor = InvocationBuilder::build(OP, [ArgValue::Int(50)]).unwrap();
        let mut params = params(&[descriptor.operation().name()]).unwrap();
        params.insert(descriptor.arguments()).unwrap();

        use jsonrpsee_core::traits::ToRpcParams;
        let raw = params.to_rpc_params().unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(raw.get()).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["test.Op", [{ "type": "int", "value": 50 }]])
        );
    }
}
