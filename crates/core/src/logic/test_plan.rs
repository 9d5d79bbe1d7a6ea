use crate::prelude::*;

use std::sync::Arc;

/// One execution of a sampler: setup, concurrent sampling, teardown.
#[derive(Builder)]
pub struct TestPlan<S: Sampler> {
    sampler: S,

    connector: Arc<dyn Connector>,

    run_parameters: RunParameters,

    #[builder(default = MAX_ERROR_DETAIL_CHARS)]
    max_error_detail_chars: usize,

    #[builder(default)]
    cancellation: CancellationToken,
}

impl<S: Sampler> TestPlan<S> {
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Runs the plan. Configuration and identity errors abort before any
    /// sample is taken; per-iteration failures end up in `sink`.
    pub async fn run(
        &self,
        test_context: &dyn TestContext,
        sink: &mut dyn SampleSink,
    ) -> Result<RunSummary> {
        let name = self.sampler.name();
        info!("Setting up sampler `{name}`");
        for parameter in self.sampler.declared_parameters().iter() {
            debug!(
                "Parameter {} = `{}`",
                parameter.name(),
                ParameterSet::resolve(test_context, parameter)
            );
        }

        let setup_channel = connect_with_retry(
            self.connector.as_ref(),
            self.run_parameters.retry_policy(),
            &self.cancellation,
        )
        .await
        .map_err(Error::SetupConnection)?;

        let mut resolver = IdentityResolver::new();
        let bound = {
            let mut context =
                SetupContext::new(setup_channel.as_ref(), test_context, &mut resolver);
            Arc::new(self.sampler.setup(&mut context).await?)
        };

        // Signatures are static, one build exposes a mismatch before load starts.
        let probe = bound.build_invocation()?;
        info!(
            "Sampler `{name}` invokes `{}`, {} iterations planned",
            probe.operation().name(),
            self.run_parameters.total_iterations()
        );

        let executor = SampleExecutor::builder()
            .hook(Arc::new(SamplerHook(Arc::clone(&bound))))
            .max_error_detail_chars(self.max_error_detail_chars)
            .build();
        let sample_fn = Arc::new(InvocationSampleFn::new(
            Arc::clone(&bound),
            executor,
            probe.operation().name(),
        ));
        let coordinator =
            ConcurrencyCoordinator::from_parameters(&self.run_parameters, self.cancellation.clone());
        let outcome = coordinator
            .run(Arc::clone(&self.connector), sample_fn, sink)
            .await;

        info!("Tearing down sampler `{name}`");
        if let Err(e) = bound.teardown(setup_channel.as_ref()).await {
            warn!("Teardown of sampler `{name}` failed: {e}");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::time::Duration;

    fn parameters(virtual_users: usize, iterations: usize) -> RunParameters {
        RunParameters::builder()
            .virtual_users(virtual_users)
            .iterations_per_user(iterations)
            .retry_policy(
                RetryPolicy::builder()
                    .max_attempts(1)
                    .delay(Duration::ZERO)
                    .build(),
            )
            .build()
    }

    fn network() -> Arc<StubNetwork> {
        StubNetwork::new()
            .with_notary("Notary", "key-notary")
            .with_party("PartyB", "key-b")
            .shared()
    }

    #[tokio::test]
    async fn iou_plan_end_to_end() {
        let network = network();
        let plan = TestPlan::builder()
            .sampler(IouSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(1, 3))
            .build();
        let test_context = MapTestContext::from_iter([("otherPartyName", "PartyB")]);
        let mut sink = VecSink::new();

        let summary = plan.run(&test_context, &mut sink).await.unwrap();

        assert_eq!(*summary.samples(), 3);
        assert_eq!(*summary.failures(), 0);
        assert_eq!(sink.samples().len(), 3);

        let invoked = network.invoked.lock().unwrap().clone();
        assert_eq!(invoked.len(), 3);
        for descriptor in &invoked {
            assert_eq!(descriptor.operation(), &EXAMPLE_FLOW_INITIATOR);
            let [ArgValue::Int(amount), ArgValue::Party(party)] = descriptor.arguments().as_slice()
            else {
                panic!("unexpected arguments {:?}", descriptor.arguments());
            };
            assert_eq!(*amount, 50);
            assert_eq!(party.display_name(), "PartyB");
            assert_eq!(party.canonical_key().as_str(), "key-b");
        }
        // Resolved once during setup, never during sampling.
        assert_eq!(StubNetwork::count(&network.lookups), 1);
    }

    #[tokio::test]
    async fn unknown_counterparty_aborts_before_sampling() {
        let network = network();
        let plan = TestPlan::builder()
            .sampler(IouSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(2, 2))
            .build();
        let test_context = MapTestContext::from_iter([("otherPartyName", "PartyZ")]);
        let mut sink = VecSink::new();

        let error = plan.run(&test_context, &mut sink).await.unwrap_err();

        assert!(matches!(
            error,
            Error::Identity(IdentityError::NotFound { .. })
        ));
        assert!(sink.samples().is_empty());
        assert_eq!(StubNetwork::count(&network.invocations), 0);
    }

    #[tokio::test]
    async fn malformed_amount_aborts_before_sampling() {
        let network = network();
        let plan = TestPlan::builder()
            .sampler(IouSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(1, 1))
            .build();
        let test_context =
            MapTestContext::from_iter([("otherPartyName", "PartyB"), ("IouAmount", "lots")]);
        let mut sink = VecSink::new();

        let error = plan.run(&test_context, &mut sink).await.unwrap_err();

        assert!(matches!(error, Error::Configuration(_)));
        assert!(sink.samples().is_empty());
    }

    #[tokio::test]
    async fn amount_beyond_32_bits_aborts_before_sampling() {
        let network = network();
        let plan = TestPlan::builder()
            .sampler(IouSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(1, 2))
            .build();
        let test_context = MapTestContext::from_iter([
            ("otherPartyName", "PartyB"),
            ("IouAmount", "3000000000"),
        ]);
        let mut sink = VecSink::new();

        let error = plan.run(&test_context, &mut sink).await.unwrap_err();

        assert!(matches!(
            error,
            Error::Configuration(ConfigurationError::InvalidValue { .. })
        ));
        assert!(sink.samples().is_empty());
        assert_eq!(StubNetwork::count(&network.invocations), 0);
    }

    #[tokio::test]
    async fn unreachable_node_fails_setup() {
        let network = StubNetwork::new().with_failing_connects(usize::MAX).shared();
        let plan = TestPlan::builder()
            .sampler(CashIssueSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(1, 1))
            .build();

        let error = plan
            .run(&MapTestContext::new(), &mut VecSink::new())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::SetupConnection(_)));
    }

    #[tokio::test]
    async fn sampler_hook_attaches_metrics() {
        let network = StubNetwork::new()
            .with_notary("Notary", "key-notary")
            .with_party("PartyB", "key-b")
            .with_invoke(|_| InvokeBehavior::Respond(serde_json::json!({ "stateCount": 2 })))
            .shared();
        let plan = TestPlan::builder()
            .sampler(CashIssueAndPaymentSampler)
            .connector(Arc::new(StubConnector::new(&network)) as Arc<dyn Connector>)
            .run_parameters(parameters(1, 2))
            .build();
        let test_context = MapTestContext::from_iter([("otherPartyName", "PartyB")]);
        let mut sink = VecSink::new();

        plan.run(&test_context, &mut sink).await.unwrap();

        for sample in sink.samples() {
            let metrics = sample.response_metrics().as_ref().unwrap();
            assert_eq!(metrics["stateCount"], 2);
        }
    }
}
