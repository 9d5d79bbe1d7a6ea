use crate::prelude::*;

pub const USE_COIN_SELECTION: Parameter = Parameter::new(
    "useCoinSelection",
    "false",
    META,
    "True to use coin selection and false (or anything else) to avoid coin selection.",
);

pub const ANONYMOUS_IDENTITIES: Parameter = Parameter::new(
    "anonymousIdentities",
    "false",
    META,
    "True to use anonymous identities and false (or anything else) to use well known identities.",
);

const SIGNATURE: &[ArgKind] = &[
    ArgKind::Amount,
    ArgKind::Bytes,
    ArgKind::Party,
    ArgKind::Bool,
    ArgKind::Party,
];

pub const CASH_ISSUE_AND_PAYMENT: OperationHandle = OperationHandle::new(
    "com.r3.corda.enterprise.perftestcordapp.flows.CashIssueAndPaymentFlow",
    SIGNATURE,
);

pub const CASH_ISSUE_AND_PAYMENT_NO_SELECTION: OperationHandle = OperationHandle::new(
    "com.r3.corda.enterprise.perftestcordapp.flows.CashIssueAndPaymentNoSelection",
    SIGNATURE,
);

/// Issues cash and pays it to a counterparty, with or without coin selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashIssueAndPaymentSampler;

#[derive(Debug, Getters)]
pub struct BoundCashIssueAndPaymentSampler {
    #[getset(get = "pub")]
    notary: ResolvedIdentity,

    #[getset(get = "pub")]
    counterparty: ResolvedIdentity,

    #[getset(get = "pub")]
    use_coin_selection: bool,

    #[getset(get = "pub")]
    anonymous_identities: bool,
}

impl BoundCashIssueAndPaymentSampler {
    fn amount() -> Amount {
        Amount::of_major(2_000_000, "GBP")
    }

    fn operation(&self) -> OperationHandle {
        if self.use_coin_selection {
            CASH_ISSUE_AND_PAYMENT
        } else {
            CASH_ISSUE_AND_PAYMENT_NO_SELECTION
        }
    }
}

#[async_trait]
impl Sampler for CashIssueAndPaymentSampler {
    type Bound = BoundCashIssueAndPaymentSampler;

    fn name(&self) -> &'static str {
        "cash-issue-and-payment"
    }

    fn declared_parameters(&self) -> ParameterSet {
        ParameterSet::from_iter([NOTARY, OTHER_PARTY, USE_COIN_SELECTION, ANONYMOUS_IDENTITIES])
    }

    async fn setup(&self, context: &mut SetupContext<'_>) -> Result<Self::Bound> {
        let notary = context.notary().await?;
        let counterparty = context.party(&OTHER_PARTY).await?;
        Ok(BoundCashIssueAndPaymentSampler {
            notary,
            counterparty,
            use_coin_selection: context.flag(&USE_COIN_SELECTION),
            anonymous_identities: context.flag(&ANONYMOUS_IDENTITIES),
        })
    }
}

impl BoundSampler for BoundCashIssueAndPaymentSampler {
    fn build_invocation(&self) -> Result<InvocationDescriptor, InvocationBuildError> {
        InvocationBuilder::build(
            self.operation(),
            [
                ArgValue::Amount(Self::amount()),
                ArgValue::Bytes(ISSUER_REF.to_vec()),
                ArgValue::Party(ResolvedIdentity::clone(&self.counterparty)),
                ArgValue::Bool(self.anonymous_identities),
                ArgValue::Party(ResolvedIdentity::clone(&self.notary)),
            ],
        )
    }

    /// Keeps the numeric figures the flow reports, e.g. its own timings.
    fn process_response(
        &self,
        response: &Response,
        metrics: &mut ResponseMetrics,
    ) -> Result<(), HookError> {
        let Some(fields) = response.as_object() else {
            return Err(HookError::new(format!(
                "expected an object response, got {response}"
            )));
        };
        metrics.extend(
            fields
                .iter()
                .filter(|(_, value)| value.is_number())
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Ok(())
    }
}
