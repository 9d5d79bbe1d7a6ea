use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NotarySelector {
    Named(String),
    FirstAvailable,
}

/// Resolves display names to network identities, once per test-plan run.
///
/// Every successful resolution is cached: asking again for the same name
/// returns the same shared [`ResolvedIdentity`] without another network call.
/// Failures are not cached, but they abort setup anyway.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    parties: IndexMap<String, ResolvedIdentity>,
    notaries: IndexMap<NotarySelector, ResolvedIdentity>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve_party(
        &mut self,
        channel: &dyn RpcChannel,
        name: &str,
    ) -> Result<ResolvedIdentity, IdentityError> {
        if let Some(identity) = self.parties.get(name) {
            return Ok(ResolvedIdentity::clone(identity));
        }
        let identity = Self::lookup_unique(channel, name).await?;
        info!("Resolved party `{name}` to {identity}");
        self.parties
            .insert(name.to_owned(), ResolvedIdentity::clone(&identity));
        Ok(identity)
    }

    /// Resolves the notary by name, or picks the first notary the network map
    /// reports when `name` is absent or blank.
    pub async fn resolve_notary(
        &mut self,
        channel: &dyn RpcChannel,
        name: Option<&str>,
    ) -> Result<ResolvedIdentity, IdentityError> {
        let selector = match name.map(str::trim) {
            Some(name) if !name.is_empty() => NotarySelector::Named(name.to_owned()),
            _ => NotarySelector::FirstAvailable,
        };
        if let Some(identity) = self.notaries.get(&selector) {
            return Ok(ResolvedIdentity::clone(identity));
        }

        let identity = match &selector {
            NotarySelector::Named(name) => Self::lookup_unique(channel, name).await?,
            NotarySelector::FirstAvailable => Self::first_notary(channel).await?,
        };
        info!("Using notary {identity}");
        self.notaries
            .insert(selector, ResolvedIdentity::clone(&identity));
        Ok(identity)
    }

    async fn lookup_unique(
        channel: &dyn RpcChannel,
        name: &str,
    ) -> Result<ResolvedIdentity, IdentityError> {
        let mut matches = channel
            .lookup_identity_by_name(name)
            .await
            .map_err(|e| IdentityError::Lookup {
                name: name.to_owned(),
                underlying: e,
            })?;
        match matches.len() {
            0 => Err(IdentityError::NotFound {
                name: name.to_owned(),
            }),
            1 => Ok(ResolvedIdentity::new(matches.remove(0))),
            n => Err(IdentityError::Ambiguous {
                name: name.to_owned(),
                matches: n,
            }),
        }
    }

    async fn first_notary(channel: &dyn RpcChannel) -> Result<ResolvedIdentity, IdentityError> {
        let notaries = channel
            .list_notaries()
            .await
            .map_err(|e| IdentityError::Lookup {
                name: "<notaries>".to_owned(),
                underlying: e,
            })?;
        if notaries.len() > 1 {
            debug!(
                "{} notaries available, picking the first one",
                notaries.len()
            );
        }
        notaries
            .into_iter()
            .next()
            .map(ResolvedIdentity::new)
            .ok_or(IdentityError::NoNotaryAvailable)
    }
}
