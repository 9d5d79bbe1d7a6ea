use crate::prelude::*;

pub const IOU_AMOUNT: Parameter = Parameter::new("IouAmount", "50", META, "How many USD do we owe?");

pub const EXAMPLE_FLOW_INITIATOR: OperationHandle = OperationHandle::new(
    "com.example.flow.ExampleFlow$Initiator",
    &[ArgKind::Int, ArgKind::Party],
);

/// Issues an IOU of a configurable amount to a counterparty.
#[derive(Debug, Clone, Copy, Default)]
pub struct IouSampler;

#[derive(Debug, Getters)]
pub struct BoundIouSampler {
    #[getset(get = "pub")]
    notary: ResolvedIdentity,

    #[getset(get = "pub")]
    counterparty: ResolvedIdentity,

    #[getset(get = "pub")]
    amount: i32,
}

#[async_trait]
impl Sampler for IouSampler {
    type Bound = BoundIouSampler;

    fn name(&self) -> &'static str {
        "iou"
    }

    fn declared_parameters(&self) -> ParameterSet {
        ParameterSet::from_iter([NOTARY, OTHER_PARTY, IOU_AMOUNT])
    }

    async fn setup(&self, context: &mut SetupContext<'_>) -> Result<Self::Bound> {
        // The flow itself does not take the notary, resolving it still checks
        // that the network can notarise.
        let notary = context.notary().await?;
        let counterparty = context.party(&OTHER_PARTY).await?;
        // The flow takes a 32-bit amount.
        let amount = context.parsed::<i32>(&IOU_AMOUNT)?;
        Ok(BoundIouSampler {
            notary,
            counterparty,
            amount,
        })
    }
}

impl BoundSampler for BoundIouSampler {
    fn build_invocation(&self) -> Result<InvocationDescriptor, InvocationBuildError> {
        InvocationBuilder::build(
            EXAMPLE_FLOW_INITIATOR,
            [
                ArgValue::Int(i64::from(self.amount)),
                ArgValue::Party(ResolvedIdentity::clone(&self.counterparty)),
            ],
        )
    }
}
