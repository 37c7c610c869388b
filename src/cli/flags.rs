//! Typed view over a command's parsed flags.

use clap::ArgMatches;
use std::collections::BTreeMap;

use super::registry::{CommandSpec, FlagDefault, FlagKind};
use crate::error::{Error, Result};
use crate::ids::IdGenerator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Text(String),
    Switch(bool),
}

/// Flag name to value, populated once per invocation.
///
/// Generated defaults are drawn here, so two invocations never share one.
#[derive(Debug, Clone, Default)]
pub struct ParsedFlags {
    values: BTreeMap<&'static str, FlagValue>,
}

impl ParsedFlags {
    pub fn resolve(spec: &CommandSpec, matches: &ArgMatches, ids: &dyn IdGenerator) -> Self {
        let mut values = BTreeMap::new();

        for flag in spec.flags {
            let value = match flag.kind {
                FlagKind::Boolean => Some(FlagValue::Switch(matches.get_flag(flag.name))),
                FlagKind::String => matches
                    .get_one::<String>(flag.name)
                    .cloned()
                    .or_else(|| match flag.default {
                        Some(FlagDefault::GeneratedId) => Some(ids.generate()),
                        Some(FlagDefault::Literal(value)) => Some(value.to_string()),
                        None => None,
                    })
                    .map(FlagValue::Text),
            };

            if let Some(value) = value {
                values.insert(flag.name, value);
            }
        }

        Self { values }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FlagValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Like [`text`](Self::text) but a missing or blank value is a validation error.
    pub fn require_text(&self, name: &str) -> Result<&str> {
        self.text(name)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::validation(format!("Missing required flag --{name}")))
    }

    pub fn switch(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FlagValue::Switch(true)))
    }
}
