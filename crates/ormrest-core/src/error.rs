//! Core error types.

use thiserror::Error;

/// Errors raised while converting models into schema descriptors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller-supplied options or declarations.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A column type has no explicit, native or wrapped mapping.
    #[error("could not find field for column type `{type_name}`{}", property_suffix(.key))]
    UnmappedType {
        /// Name of the most specific unresolvable type.
        type_name: String,
        /// Key of the property being converted, when known.
        key: Option<String>,
    },

    /// A relationship points at a model the catalog does not declare.
    #[error("could not resolve related model `{target}` for relationship `{key}`")]
    UnresolvedRelationship {
        /// Relationship property key.
        key: String,
        /// Declared target model.
        target: String,
    },

    /// An option is not accepted by a descriptor kind.
    #[error("invalid option `{option}` for {kind} field: {reason}")]
    InvalidOption {
        /// Descriptor kind name.
        kind: &'static str,
        /// Option name.
        option: String,
        /// Why the option was rejected.
        reason: String,
    },

    /// The assembled schema cannot be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A nested placeholder names a model that is not registered.
    #[error("model `{model}` field `{field}` references unknown model `{target}`")]
    UnresolvedReference {
        /// Model holding the nested field.
        model: String,
        /// Nested field key.
        field: String,
        /// Referenced model name.
        target: String,
    },
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid options; raised before any property is enumerated.
    Configuration,
    /// A property could not be turned into a descriptor.
    Conversion,
    /// The assembled schema failed its serialization check.
    Serialization,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::UnmappedType { .. }
            | Error::UnresolvedRelationship { .. }
            | Error::InvalidOption { .. } => ErrorKind::Conversion,
            Error::Serialization(_) | Error::UnresolvedReference { .. } => {
                ErrorKind::Serialization
            }
        }
    }

    /// Attach the originating property key to an unmapped type error.
    pub(crate) fn for_property(self, property: &str) -> Self {
        match self {
            Error::UnmappedType {
                type_name,
                key: None,
            } => Error::UnmappedType {
                type_name,
                key: Some(property.to_string()),
            },
            other => other,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

fn property_suffix(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" (property `{}`)", key),
        None => String::new(),
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
