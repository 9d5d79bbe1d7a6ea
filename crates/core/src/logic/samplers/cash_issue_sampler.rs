use crate::prelude::*;

pub const CASH_ISSUE_FLOW: OperationHandle = OperationHandle::new(
    "net.corda.finance.flows.CashIssueFlow",
    &[ArgKind::Amount, ArgKind::Bytes, ArgKind::Party],
);

/// Issues a fixed amount of cash. Only the notary is configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashIssueSampler;

#[derive(Debug, Getters)]
pub struct BoundCashIssueSampler {
    #[getset(get = "pub")]
    notary: ResolvedIdentity,
}

impl BoundCashIssueSampler {
    fn amount() -> Amount {
        Amount::of_major(100_000, "USD")
    }
}

#[async_trait]
impl Sampler for CashIssueSampler {
    type Bound = BoundCashIssueSampler;

    fn name(&self) -> &'static str {
        "cash-issue"
    }

    fn declared_parameters(&self) -> ParameterSet {
        ParameterSet::from_iter([NOTARY])
    }

    async fn setup(&self, context: &mut SetupContext<'_>) -> Result<Self::Bound> {
        Ok(BoundCashIssueSampler {
            notary: context.notary().await?,
        })
    }
}

impl BoundSampler for BoundCashIssueSampler {
    fn build_invocation(&self) -> Result<InvocationDescriptor, InvocationBuildError> {
        InvocationBuilder::build(
            CASH_ISSUE_FLOW,
            [
                ArgValue::Amount(Self::amount()),
                ArgValue::Bytes(ISSUER_REF.to_vec()),
                ArgValue::Party(ResolvedIdentity::clone(&self.notary)),
            ],
        )
    }
}
