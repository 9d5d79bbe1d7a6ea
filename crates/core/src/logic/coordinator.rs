use crate::prelude::*;

use std::sync::Arc;
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinSet,
};

/// Produces the sample of one iteration on a virtual user's connection.
///
/// An `Err` is fatal to the whole run; ordinary remote failures must be
/// returned as failed samples instead.
#[async_trait]
pub trait SampleFn: Send + Sync + 'static {
    async fn sample(&self, connection: &dyn RpcChannel, origin: SampleOrigin) -> Result<Sample>;

    /// Label used for samples recorded without a connection.
    fn label(&self) -> String;
}

/// Builds an invocation from a bound sampler and executes it.
#[derive(Debug)]
pub struct InvocationSampleFn<B> {
    sampler: Arc<B>,
    executor: SampleExecutor,
    label: String,
}

impl<B: BoundSampler> InvocationSampleFn<B> {
    pub fn new(sampler: Arc<B>, executor: SampleExecutor, label: impl Into<String>) -> Self {
        Self {
            sampler,
            executor,
            label: label.into(),
        }
    }
}

#[async_trait]
impl<B: BoundSampler> SampleFn for InvocationSampleFn<B> {
    async fn sample(&self, connection: &dyn RpcChannel, origin: SampleOrigin) -> Result<Sample> {
        let descriptor = self.sampler.build_invocation()?;
        Ok(self.executor.execute(connection, descriptor, origin).await)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// What a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct RunSummary {
    #[getset(get = "pub")]
    samples: usize,

    #[getset(get = "pub")]
    failures: usize,

    #[getset(get = "pub")]
    cancelled: bool,
}

/// Runs virtual users concurrently, each iterating sequentially on a
/// connection of its own.
#[derive(Debug, Clone, Builder)]
pub struct ConcurrencyCoordinator {
    virtual_users: usize,

    iterations_per_user: usize,

    #[builder(default)]
    retry_policy: RetryPolicy,

    #[builder(default)]
    cancellation: CancellationToken,
}

struct VirtualUser {
    index: usize,
    iterations: usize,
    connector: Arc<dyn Connector>,
    sample_fn: Arc<dyn SampleFn>,
    retry_policy: RetryPolicy,
    cancellation: CancellationToken,
    samples: UnboundedSender<Sample>,
}

impl ConcurrencyCoordinator {
    pub fn from_parameters(parameters: &RunParameters, cancellation: CancellationToken) -> Self {
        Self::builder()
            .virtual_users(*parameters.virtual_users())
            .iterations_per_user(*parameters.iterations_per_user())
            .retry_policy(*parameters.retry_policy())
            .cancellation(cancellation)
            .build()
    }

    /// Runs all virtual users to completion and hands every sample to `sink`.
    ///
    /// Without cancellation or a fatal error, exactly
    /// `virtual_users * iterations_per_user` samples are recorded.
    pub async fn run(
        &self,
        connector: Arc<dyn Connector>,
        sample_fn: Arc<dyn SampleFn>,
        sink: &mut dyn SampleSink,
    ) -> Result<RunSummary> {
        info!(
            "Starting {} virtual users with {} iterations each against {}",
            self.virtual_users,
            self.iterations_per_user,
            connector.endpoint()
        );
        let (producer, mut consumer) = mpsc::unbounded_channel();
        let mut users = JoinSet::new();
        for index in 0..self.virtual_users {
            let user = VirtualUser {
                index,
                iterations: self.iterations_per_user,
                connector: Arc::clone(&connector),
                sample_fn: Arc::clone(&sample_fn),
                retry_policy: self.retry_policy,
                cancellation: self.cancellation.clone(),
                samples: producer.clone(),
            };
            users.spawn(user.run());
        }
        drop(producer);

        let mut summary = RunSummary::default();
        while let Some(sample) = consumer.recv().await {
            summary.samples += 1;
            if !sample.success() {
                summary.failures += 1;
            }
            if let Err(e) = sink.record(sample) {
                error!("Failed to record sample, stopping the run: {e}");
                self.cancellation.cancel();
                return Err(e.into());
            }
        }
        sink.flush()?;

        let mut fatal = None;
        while let Some(joined) = users.join_next().await {
            let outcome = joined.map_err(|e| Error::JoinVirtualUser(Box::new(e)));
            if let Err(e) = outcome.and_then(|result| result) {
                fatal.get_or_insert(e);
            }
        }
        if let Some(e) = fatal {
            return Err(e);
        }

        summary.cancelled = self.cancellation.is_cancelled();
        info!(
            "Recorded {} samples, {} failed{}",
            summary.samples,
            summary.failures,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(summary)
    }
}

impl VirtualUser {
    async fn run(self) -> Result<()> {
        debug!("VU {}: connecting", self.index);
        let mut connection = match connect_with_retry(
            self.connector.as_ref(),
            &self.retry_policy,
            &self.cancellation,
        )
        .await
        {
            Ok(connection) => Ok(connection),
            Err(e) => {
                warn!("VU {}: no connection, all iterations will fail: {e}", self.index);
                Err(e)
            }
        };

        for iteration in 0..self.iterations {
            if self.cancellation.is_cancelled() {
                info!("VU {}: cancelled after {iteration} iterations", self.index);
                break;
            }
            let origin = SampleOrigin {
                virtual_user: self.index,
                iteration,
            };
            let sample = match &connection {
                Ok(channel) => match self.sample_fn.sample(channel.as_ref(), origin).await {
                    Ok(sample) => sample,
                    Err(e) => {
                        error!("VU {}: fatal error, cancelling the run: {e}", self.index);
                        self.cancellation.cancel();
                        return Err(e);
                    }
                },
                Err(reason) => Sample::connection_unavailable(origin, self.sample_fn.label(), reason),
            };

            let lost = connection.is_ok() && sample.connection_lost();
            if self.samples.send(sample).is_err() {
                // The consumer is gone, the run has been aborted.
                break;
            }
            if lost {
                connection = self.reconnect().await;
            }
        }
        Ok(())
    }

    async fn reconnect(&self) -> Result<Box<dyn RpcChannel>, RpcError> {
        if !self.retry_policy.reconnects() {
            warn!("VU {}: connection lost, reconnecting is disabled", self.index);
            return Err(RpcError::ConnectionLost {
                underlying: "connection dropped and reconnecting is disabled".to_owned(),
            });
        }
        warn!("VU {}: connection lost, reconnecting", self.index);
        connect_with_retry(
            self.connector.as_ref(),
            &self.retry_policy,
            &self.cancellation,
        )
        .await
    }
}
