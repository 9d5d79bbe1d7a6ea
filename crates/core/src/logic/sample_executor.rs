use crate::prelude::*;

use chrono::Utc;
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Instant,
};

/// Post-processing of a successful response.
pub trait ResponseHook: Send + Sync + fmt::Debug {
    fn process(&self, response: &Response, metrics: &mut ResponseMetrics) -> Result<(), HookError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl ResponseHook for NoopHook {
    fn process(&self, _: &Response, _: &mut ResponseMetrics) -> Result<(), HookError> {
        Ok(())
    }
}

/// Adapts a closure into a [`ResponseHook`].
pub struct FnHook<F>(pub F);

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHook")
    }
}

impl<F> ResponseHook for FnHook<F>
where
    F: Fn(&Response, &mut ResponseMetrics) -> Result<(), HookError> + Send + Sync,
{
    fn process(&self, response: &Response, metrics: &mut ResponseMetrics) -> Result<(), HookError> {
        (self.0)(response, metrics)
    }
}

/// Routes responses to [`BoundSampler::process_response`].
pub struct SamplerHook<B>(pub Arc<B>);

impl<B> fmt::Debug for SamplerHook<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SamplerHook")
    }
}

impl<B: BoundSampler> ResponseHook for SamplerHook<B> {
    fn process(&self, response: &Response, metrics: &mut ResponseMetrics) -> Result<(), HookError> {
        self.0.process_response(response, metrics)
    }
}

fn noop_hook() -> Arc<dyn ResponseHook> {
    Arc::new(NoopHook)
}

/// Times one remote call and turns every outcome into a [`Sample`].
#[derive(Debug, Clone, Builder)]
pub struct SampleExecutor {
    #[builder(default = noop_hook())]
    hook: Arc<dyn ResponseHook>,

    #[builder(default = MAX_ERROR_DETAIL_CHARS)]
    max_error_detail_chars: usize,
}

impl Default for SampleExecutor {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

impl SampleExecutor {
    /// A panicking hook is reported like a failing one.
    fn run_hook(&self, response: &Response, metrics: &mut ResponseMetrics) -> Result<(), HookError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.hook.process(response, metrics)))
            .unwrap_or_else(|payload| {
                Err(HookError::new(format!(
                    "hook panicked: {}",
                    panic_message(payload.as_ref())
                )))
            })
    }

    /// Runs `descriptor` on `connection`. Never fails: remote errors, timeouts
    /// and dropped connections all come back as failed samples.
    pub async fn execute(
        &self,
        connection: &dyn RpcChannel,
        descriptor: InvocationDescriptor,
        origin: SampleOrigin,
    ) -> Sample {
        let label = descriptor.operation().name();
        let rpc_timeout = connection.rpc_timeout();

        let start_time = Utc::now();
        let started = Instant::now();
        let outcome = tokio::time::timeout(rpc_timeout, connection.invoke(&descriptor))
            .await
            .unwrap_or(Err(RpcError::Timeout { after: rpc_timeout }));
        let latency = started.elapsed();
        let end_time = start_time
            + chrono::Duration::from_std(latency).unwrap_or_else(|_| chrono::Duration::zero());

        let sample = Sample::builder()
            .origin(origin)
            .label(label)
            .start_time(start_time)
            .end_time(end_time)
            .latency(latency);

        match outcome {
            Ok(response) => {
                let mut metrics = ResponseMetrics::new();
                if let Err(e) = self.run_hook(&response, &mut metrics) {
                    warn!(
                        "VU {} #{}: response processing for {label} failed: {e}",
                        origin.virtual_user, origin.iteration
                    );
                }
                sample
                    .success(true)
                    .maybe_response_metrics((!metrics.is_empty()).then_some(metrics))
                    .build()
            }
            Err(e) => {
                debug!(
                    "VU {} #{}: {label} failed: {e}",
                    origin.virtual_user, origin.iteration
                );
                sample
                    .success(false)
                    .error_kind(e.kind())
                    .error_detail(truncate_error_detail(
                        &e.to_string(),
                        self.max_error_detail_chars,
                    ))
                    .build()
            }
        }
    }
}
