//! Reads the `DIFFPIN_*` variables that override the config files.
//!
//! The binary reads the process environment through [`Env::real()`]. Unit
//! tests swap in a fixed map so config layering and log setup never touch
//! process state.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// Source of `DIFFPIN_*` overrides.
#[derive(Clone, Debug, Default)]
pub struct Env {
    fixed: Option<HashMap<String, String>>,
}

impl Env {
    pub fn real() -> Self {
        Self { fixed: None }
    }

    /// An environment holding only `vars`.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            fixed: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub fn var(&self, name: &str) -> Option<String> {
        match &self.fixed {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// The value of `name`, or `None` when it is unset or blank.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.trim().is_empty())
    }

    /// Parse the trimmed value of `name`.
    ///
    /// A value that does not parse is logged and treated as unset, so a typo
    /// in one override never aborts a run.
    pub fn parsed<T>(&self, name: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.non_empty(name)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("ignoring invalid {name} value {raw:?}: {err}");
                None
            }
        }
    }
}
