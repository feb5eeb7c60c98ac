//! Conversion options.

use crate::catalog::PropertyRef;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Caller options controlling which properties are converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Only convert these property keys.
    pub only: Option<BTreeSet<String>>,
    /// Never convert these property keys.
    pub exclude: Option<BTreeSet<String>>,
    /// Convert relationships into nested fields.
    pub include_relationships: bool,
    /// Sort the assembled fields by key.
    pub sorted: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            only: None,
            exclude: None,
            include_relationships: false,
            sorted: true,
        }
    }
}

impl ConvertOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict conversion to `keys`.
    pub fn only<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Skip `keys`.
    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn include_relationships(mut self, include: bool) -> Self {
        self.include_relationships = include;
        self
    }

    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Reject option combinations that cannot be honoured.
    ///
    /// An empty `only` or `exclude` restricts nothing and never conflicts.
    pub fn validate(&self) -> Result<()> {
        let restricts =
            |keys: &Option<BTreeSet<String>>| keys.as_ref().is_some_and(|k| !k.is_empty());
        if restricts(&self.only) && restricts(&self.exclude) {
            return Err(Error::config(
                "cannot set both `only` and `exclude` options for the same schema",
            ));
        }
        Ok(())
    }

    /// Why `prop` is filtered out, or `None` if it is converted.
    ///
    /// Rules apply in order: private (`_` prefix), not in `only`, in
    /// `exclude`, relationship without `include_relationships`.
    pub fn exclusion_reason(&self, prop: &PropertyRef<'_>) -> Option<&'static str> {
        let key = prop.key();
        if key.starts_with('_') {
            return Some("private");
        }
        if let Some(only) = self.only.as_ref().filter(|only| !only.is_empty()) {
            if !only.contains(key) {
                return Some("not in only");
            }
        }
        if self.exclude.as_ref().is_some_and(|exclude| exclude.contains(key)) {
            return Some("excluded");
        }
        if prop.is_relationship() && !self.include_relationships {
            return Some("relationship");
        }
        None
    }

    /// Parse options from a JSON object.
    ///
    /// `only` and `exclude` must be lists of strings when present.
    pub fn from_json(document: &Value) -> Result<Self> {
        let Value::Object(map) = document else {
            return Err(Error::config("options must be a mapping"));
        };
        for name in ["only", "exclude"] {
            match map.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
                Some(_) => {
                    return Err(Error::config(format!(
                        "`{}` option must be a list or set",
                        name
                    )))
                }
            }
        }
        let options: ConvertOptions = serde_json::from_value(document.clone())
            .map_err(|e| Error::config(format!("invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }
}
