use crate::prelude::*;

/// The samplers this binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SamplerKind {
    /// Issue an IOU to a counterparty (`com.example.flow.ExampleFlow$Initiator`).
    Iou,
    /// Self-issue cash (`CashIssueFlow`).
    CashIssue,
    /// Issue cash and pay it to a counterparty, with or without coin selection.
    CashIssueAndPayment,
}

impl SamplerKind {
    pub fn name(&self) -> &'static str {
        match self {
            SamplerKind::Iou => IouSampler.name(),
            SamplerKind::CashIssue => CashIssueSampler.name(),
            SamplerKind::CashIssueAndPayment => CashIssueAndPaymentSampler.name(),
        }
    }

    pub fn declared_parameters(&self) -> ParameterSet {
        match self {
            SamplerKind::Iou => IouSampler.declared_parameters(),
            SamplerKind::CashIssue => CashIssueSampler.declared_parameters(),
            SamplerKind::CashIssueAndPayment => CashIssueAndPaymentSampler.declared_parameters(),
        }
    }
}
