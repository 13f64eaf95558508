//! Error types.
//!
//! Two classes matter to callers: *shape* errors describe a schema the
//! registry would reject and are reported back through the plugin response,
//! while *integrity* errors mean the request itself is inconsistent and abort
//! the whole invocation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(
        "{file}: only one top-level type may be defined in a file (found {found} top-level messages); \
         use nested types or imports (see https://cloud.google.com/pubsub/docs/schemas#schema_types)"
    )]
    Shape { file: String, found: usize },

    #[error("requested file `{file}` was not supplied with the request")]
    UnknownFile { file: String },

    #[error("type `{type_name}` is not defined in any supplied file")]
    UnresolvedType { type_name: String },
}

impl CompileError {
    /// True for violations of the request contract (as opposed to a schema
    /// the registry would reject).
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            CompileError::UnknownFile { .. } | CompileError::UnresolvedType { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid value `{value}` for parameter `{key}` (expected one of: {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("field `{field}` references a message or enum but has no type name")]
    MissingTypeName { field: String },

    #[error("field `{field}` has unknown type `{value}`")]
    UnknownFieldType { field: String, value: String },

    #[error("field `{field}` has unknown label `{value}`")]
    UnknownLabel { field: String, value: String },

    #[error("failed to decode descriptor set: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("failed to parse descriptor set JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the plugin envelope itself. Anything surfaced here is reported
/// on stderr with a non-zero exit instead of inside the response.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("failed to decode CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
