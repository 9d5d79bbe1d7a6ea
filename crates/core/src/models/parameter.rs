use crate::prelude::*;

use serde::Serialize;
use std::{borrow::Cow, fmt::Display, str::FromStr};

/// Metadata tag of parameters exposed on the test-plan configuration surface.
pub const META: &str = "<meta>";

/// The notary to use; blank selects the first notary on the network map.
pub const NOTARY: Parameter = Parameter::new(
    "notaryName",
    "",
    META,
    "The X500 name of the notary to use, empty to pick the first available one.",
);

/// A named, defaulted configuration value a test plan may bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    name: Cow<'static, str>,
    default_value: Cow<'static, str>,
    metadata_tag: Cow<'static, str>,
    description: Cow<'static, str>,
}

impl Parameter {
    pub const fn new(
        name: &'static str,
        default_value: &'static str,
        metadata_tag: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            default_value: Cow::Borrowed(default_value),
            metadata_tag: Cow::Borrowed(metadata_tag),
            description: Cow::Borrowed(description),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn metadata_tag(&self) -> &str {
        &self.metadata_tag
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The parameters a sampler declares, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet(IndexMap<String, Parameter>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter. A name already declared keeps its first declaration.
    pub fn declare(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        default_value: impl Into<Cow<'static, str>>,
        metadata_tag: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Parameter {
        self.insert(Parameter {
            name: name.into(),
            default_value: default_value.into(),
            metadata_tag: metadata_tag.into(),
            description: description.into(),
        })
    }

    fn insert(&mut self, parameter: Parameter) -> Parameter {
        if let Some(existing) = self.0.get(parameter.name()) {
            warn!(
                "Parameter `{}` declared more than once, keeping the first declaration",
                parameter.name()
            );
            return existing.clone();
        }
        self.0
            .insert(parameter.name().to_owned(), parameter.clone());
        parameter
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value bound in `context`, or the declared default if absent.
    pub fn resolve(context: &dyn TestContext, parameter: &Parameter) -> String {
        context.get_parameter(parameter.name(), parameter.default_value())
    }

    /// Resolves and converts the value, failing with a [`ConfigurationError`]
    /// if it does not parse as `T`.
    pub fn resolve_parsed<T>(
        context: &dyn TestContext,
        parameter: &Parameter,
    ) -> Result<T, ConfigurationError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = Self::resolve(context, parameter);
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigurationError::InvalidValue {
                name: parameter.name().to_owned(),
                value: value.clone(),
                expected: std::any::type_name::<T>(),
                underlying: e.to_string(),
            })
    }

    /// `true` only for a case-insensitive `"true"`, anything else is `false`.
    pub fn resolve_flag(context: &dyn TestContext, parameter: &Parameter) -> bool {
        Self::resolve(context, parameter)
            .trim()
            .eq_ignore_ascii_case("true")
    }
}

impl FromIterator<Parameter> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut set = Self::new();
        for parameter in iter {
            set.insert(parameter);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT: Parameter = Parameter::new("amount", "50", META, "How many USD do we owe?");

    #[test]
    fn resolve_returns_default_when_unbound() {
        let context = MapTestContext::new();
        let mut set = ParameterSet::new();
        let amount = set.declare("amount", "50", META, "How many USD do we owe?");
        let flag = set.declare("useCoinSelection", "false", META, "Coin selection");

        assert_eq!(ParameterSet::resolve(&context, &amount), "50");
        assert_eq!(ParameterSet::resolve(&context, &flag), "false");
        for parameter in set.iter() {
            assert_eq!(
                ParameterSet::resolve(&context, parameter),
                parameter.default_value()
            );
        }
    }

    #[test]
    fn resolve_prefers_bound_value() {
        let context = MapTestContext::from_iter([("amount", "75")]);
        assert_eq!(ParameterSet::resolve(&context, &AMOUNT), "75");
        assert_eq!(
            ParameterSet::resolve_parsed::<i64>(&context, &AMOUNT),
            Ok(75)
        );
    }

    #[test]
    fn resolve_parsed_rejects_non_numeric() {
        let context = MapTestContext::from_iter([("amount", "fifty")]);
        let error = ParameterSet::resolve_parsed::<i64>(&context, &AMOUNT).unwrap_err();
        match error {
            ConfigurationError::InvalidValue { name, value, .. } => {
                assert_eq!(name, "amount");
                assert_eq!(value, "fifty");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn resolve_flag_is_lenient() {
        let flag = Parameter::new("anonymousIdentities", "false", META, "");
        for (raw, expected) in [("true", true), ("TRUE", true), ("yes", false), ("", false)] {
            let context = MapTestContext::from_iter([("anonymousIdentities", raw)]);
            assert_eq!(ParameterSet::resolve_flag(&context, &flag), expected, "{raw}");
        }
        assert!(!ParameterSet::resolve_flag(&MapTestContext::new(), &flag));
    }

    #[test]
    fn redeclaring_keeps_first_declaration() {
        let mut set = ParameterSet::new();
        set.declare("amount", "50", META, "first");
        let second = set.declare("amount", "99", META, "second");
        assert_eq!(second.default_value(), "50");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let set = ParameterSet::from_iter([NOTARY, AMOUNT]);
        let names: Vec<_> = set.iter().map(Parameter::name).collect();
        assert_eq!(names, vec!["notaryName", "amount"]);
    }
}
