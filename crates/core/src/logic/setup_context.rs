use crate::prelude::*;

use std::{fmt::Display, str::FromStr};

/// Everything a [`Sampler`] may use while binding itself to a test plan.
pub struct SetupContext<'a> {
    channel: &'a dyn RpcChannel,
    test_context: &'a dyn TestContext,
    resolver: &'a mut IdentityResolver,
}

impl<'a> SetupContext<'a> {
    pub fn new(
        channel: &'a dyn RpcChannel,
        test_context: &'a dyn TestContext,
        resolver: &'a mut IdentityResolver,
    ) -> Self {
        Self {
            channel,
            test_context,
            resolver,
        }
    }

    pub fn channel(&self) -> &dyn RpcChannel {
        self.channel
    }

    pub fn test_context(&self) -> &dyn TestContext {
        self.test_context
    }

    pub fn parameter(&self, parameter: &Parameter) -> String {
        ParameterSet::resolve(self.test_context, parameter)
    }

    pub fn parsed<T>(&self, parameter: &Parameter) -> Result<T, ConfigurationError>
    where
        T: FromStr,
        T::Err: Display,
    {
        ParameterSet::resolve_parsed(self.test_context, parameter)
    }

    pub fn flag(&self, parameter: &Parameter) -> bool {
        ParameterSet::resolve_flag(self.test_context, parameter)
    }

    /// Resolves the party named by `parameter`, which must not be blank.
    pub async fn party(&mut self, parameter: &Parameter) -> Result<ResolvedIdentity> {
        let name = self.parameter(parameter);
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigurationError::MissingValue {
                name: parameter.name().to_owned(),
            }
            .into());
        }
        Ok(self.resolver.resolve_party(self.channel, name).await?)
    }

    /// Resolves the notary named by [`NOTARY`], or the first available one.
    pub async fn notary(&mut self) -> Result<ResolvedIdentity> {
        let name = self.parameter(&NOTARY);
        Ok(self
            .resolver
            .resolve_notary(self.channel, Some(name.as_str()))
            .await?)
    }
}
