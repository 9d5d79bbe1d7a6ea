mod cash_issue_and_payment_sampler;
mod cash_issue_sampler;
mod iou_sampler;

pub use cash_issue_and_payment_sampler::*;
pub use cash_issue_sampler::*;
pub use iou_sampler::*;

use crate::prelude::*;

/// The payee, shared by the samplers that move value to a counterparty.
pub const OTHER_PARTY: Parameter =
    Parameter::new("otherPartyName", "", META, "The X500 name of the payee.");

/// Issuer reference attached to issued cash.
pub const ISSUER_REF: [u8; 1] = [1];
