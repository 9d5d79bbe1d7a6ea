use crate::prelude::*;

/// A load-test scenario: which parameters it takes, and how it binds them.
///
/// Setup runs once per test plan, before any virtual user starts. Its result,
/// the [`BoundSampler`], is the only thing that can build invocations, so
/// sampling can never observe a sampler that has not been set up.
#[async_trait]
pub trait Sampler: Send + Sync {
    type Bound: BoundSampler;

    fn name(&self) -> &'static str;

    /// Parameters exposed on the test-plan configuration surface.
    fn declared_parameters(&self) -> ParameterSet;

    async fn setup(&self, context: &mut SetupContext<'_>) -> Result<Self::Bound>;
}

/// A sampler whose parameters and identities have been resolved.
#[async_trait]
pub trait BoundSampler: Send + Sync + 'static {
    /// Builds the invocation for the next iteration. Must not perform I/O.
    fn build_invocation(&self) -> Result<InvocationDescriptor, InvocationBuildError>;

    /// Inspects a successful response and attaches derived metrics to its sample.
    fn process_response(
        &self,
        _response: &Response,
        _metrics: &mut ResponseMetrics,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs once after all virtual users have finished.
    async fn teardown(&self, _channel: &dyn RpcChannel) -> Result<()> {
        Ok(())
    }
}
