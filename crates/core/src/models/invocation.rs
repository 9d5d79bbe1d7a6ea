use crate::prelude::*;

use serde::Serialize;

/// Raw response of a remote operation.
pub type Response = serde_json::Value;

/// The type of a single argument in a remote operation's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    #[display("integer")]
    Int,
    #[display("boolean")]
    Bool,
    #[display("text")]
    Text,
    #[display("bytes")]
    Bytes,
    #[display("amount")]
    Amount,
    #[display("party")]
    Party,
}

/// A monetary amount in minor units of `currency` (e.g. pence for `GBP`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Getters)]
pub struct Amount {
    #[getset(get = "pub")]
    quantity: i64,

    #[getset(get = "pub")]
    currency: String,
}

impl Amount {
    const MINOR_UNITS_PER_MAJOR: i64 = 100;

    pub fn new(quantity: i64, currency: impl Into<String>) -> Self {
        Self {
            quantity,
            currency: currency.into(),
        }
    }

    /// Amount of `major` whole currency units, e.g. `of_major(100, "USD")` for 100 dollars.
    pub fn of_major(major: i64, currency: impl Into<String>) -> Self {
        Self::new(major * Self::MINOR_UNITS_PER_MAJOR, currency)
    }
}

/// A typed argument value of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Amount(Amount),
    Party(ResolvedIdentity),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::Text(_) => ArgKind::Text,
            ArgValue::Bytes(_) => ArgKind::Bytes,
            ArgValue::Amount(_) => ArgKind::Amount,
            ArgValue::Party(_) => ArgKind::Party,
        }
    }
}

/// Reference to a remote operation together with its declared signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OperationHandle {
    name: &'static str,
    signature: &'static [ArgKind],
}

impl OperationHandle {
    pub const fn new(name: &'static str, signature: &'static [ArgKind]) -> Self {
        Self { name, signature }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> &'static [ArgKind] {
        self.signature
    }
}

/// A remote call, fully described but not yet executed.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct InvocationDescriptor {
    #[getset(get = "pub")]
    operation: OperationHandle,

    #[getset(get = "pub")]
    arguments: Vec<ArgValue>,
}

impl InvocationDescriptor {
    /// Unchecked constructor, use [`InvocationBuilder::build`] to verify the signature.
    pub(crate) fn new_unchecked(operation: OperationHandle, arguments: Vec<ArgValue>) -> Self {
        Self {
            operation,
            arguments,
        }
    }
}
