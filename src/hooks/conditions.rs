// src/hooks/conditions.rs

//! Condition matching for tasks and inits.
//!
//! A step's `conditions` table maps a parameter field (`branch`, `event`,
//! `repository`, ...) to one or more glob patterns. A step matches when every
//! listed field is present in the request parameters and its value matches at
//! least one of the patterns. A step without conditions always matches.

use std::collections::BTreeMap;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::PatternList;
use crate::errors::{HookRunnerError, Result};
use crate::hooks::Step;
use crate::params::ParameterSet;

#[derive(Debug, Clone, Default)]
pub struct Conditions {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    field: String,
    patterns: Vec<String>,
    set: GlobSet,
}

impl Conditions {
    /// Compile the raw `conditions` table of a step.
    pub fn compile(raw: &BTreeMap<String, PatternList>) -> Result<Self> {
        let mut rules = Vec::with_capacity(raw.len());

        for (field, list) in raw {
            // An empty list could never match, which silently disables the step.
            if list.patterns().is_empty() {
                return Err(HookRunnerError::ConfigError(format!(
                    "condition on '{field}' lists no patterns"
                )));
            }

            let mut builder = GlobSetBuilder::new();
            for pattern in list.patterns() {
                let glob = Glob::new(pattern).map_err(|source| HookRunnerError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            }

            let set = builder.build().map_err(|source| HookRunnerError::InvalidPattern {
                pattern: list.patterns().join(", "),
                source,
            })?;

            rules.push(Rule {
                field: field.clone(),
                patterns: list.patterns().to_vec(),
                set,
            });
        }

        Ok(Self { rules })
    }

    /// `(field, patterns)` pairs, for diagnostics.
    pub fn describe(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules
            .iter()
            .map(|r| (r.field.as_str(), r.patterns.as_slice()))
    }

    pub fn matches(&self, parameters: &ParameterSet) -> bool {
        self.rules.iter().all(|rule| {
            parameters
                .get(&rule.field)
                .is_some_and(|value| rule.set.is_match(value))
        })
    }
}

/// Whether `step` should run for this request.
pub fn matches(step: &Step, parameters: &ParameterSet) -> bool {
    step.conditions.matches(parameters)
}
