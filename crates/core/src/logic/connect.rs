use crate::prelude::*;

/// Tries up to `policy.max_attempts()` times (at least once) to open a channel.
/// Gives up early once `cancellation` fires, also while waiting between attempts.
pub async fn connect_with_retry(
    connector: &dyn Connector,
    policy: &RetryPolicy,
    cancellation: &CancellationToken,
) -> Result<Box<dyn RpcChannel>, RpcError> {
    let attempts = (*policy.max_attempts()).max(1);
    let endpoint = connector.endpoint();
    let cancelled = |attempt: usize| {
        info!("Connecting to {endpoint} cancelled after {attempt} attempts");
        RpcError::Connect {
            url: endpoint.clone(),
            attempts: attempt,
            underlying: "cancelled".to_owned(),
        }
    };
    let mut last_error = None;
    for attempt in 1..=attempts {
        debug!("Attempt #{attempt}: Connecting to {endpoint}");
        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(cancelled(attempt - 1)),
            outcome = connector.connect() => outcome,
        };
        match outcome {
            Ok(channel) => return Ok(channel),
            Err(err) => {
                warn!("RPC client {endpoint} error: {err}");
                last_error = Some(err);
                if attempt < attempts {
                    tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => return Err(cancelled(attempt)),
                        _ = tokio::time::sleep(*policy.delay()) => {}
                    }
                }
            }
        }
    }

    let err = RpcError::Connect {
        url: endpoint,
        attempts,
        underlying: last_error
            .map(|e| e.to_string())
            .unwrap_or_default(),
    };
    error!("{err}");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::time::Duration;

    fn quick(max_attempts: usize) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(max_attempts)
            .delay(Duration::ZERO)
            .build()
    }

    #[tokio::test]
    async fn retries_until_connected() {
        let network = StubNetwork::new().with_failing_connects(2).shared();
        let connector = StubConnector::new(&network);

        let result = connect_with_retry(&connector, &quick(3), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(StubNetwork::count(&network.connects), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let network = StubNetwork::new().with_failing_connects(10).shared();
        let connector = StubConnector::new(&network);

        let Err(error) = connect_with_retry(&connector, &quick(2), &CancellationToken::new()).await else {
            panic!("expected connection failure");
        };

        assert!(matches!(error, RpcError::Connect { attempts: 2, .. }));
        assert_eq!(StubNetwork::count(&network.connects), 2);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let network = StubNetwork::new().shared();
        let connector = StubConnector::new(&network);

        assert!(connect_with_retry(&connector, &RetryPolicy::never(), &CancellationToken::new())
            .await
            .is_ok());
        assert_eq!(StubNetwork::count(&network.connects), 1);
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_retry_delay() {
        let network = StubNetwork::new().with_failing_connects(usize::MAX).shared();
        let connector = StubConnector::new(&network);
        let policy = RetryPolicy::builder()
            .max_attempts(10)
            .delay(Duration::from_secs(10))
            .build();
        let cancellation = CancellationToken::new();
        let trigger = cancellation.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            connect_with_retry(&connector, &policy, &cancellation),
        )
        .await
        .expect("retry loop should stop on cancellation");

        let Err(error) = result else {
            panic!("expected connection failure");
        };
        assert!(matches!(error, RpcError::Connect { attempts: 1, .. }));
        assert_eq!(StubNetwork::count(&network.connects), 1);
    }

    #[tokio::test]
    async fn cancelled_token_prevents_any_attempt() {
        let network = StubNetwork::new().shared();
        let connector = StubConnector::new(&network);
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let result = connect_with_retry(&connector, &quick(3), &cancellation).await;

        assert!(matches!(result, Err(RpcError::Connect { attempts: 0, .. })));
        assert_eq!(StubNetwork::count(&network.connects), 0);
    }
}
