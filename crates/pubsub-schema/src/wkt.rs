//! Well-known wrapper and temporal types that JSON encoding maps to scalars.

use crate::model::ScalarKind;

const WELL_KNOWN_SCALARS: [(&str, ScalarKind); 11] = [
    (".google.protobuf.Int32Value", ScalarKind::Int32),
    (".google.protobuf.Int64Value", ScalarKind::Int64),
    (".google.protobuf.UInt32Value", ScalarKind::UInt32),
    (".google.protobuf.UInt64Value", ScalarKind::UInt64),
    (".google.protobuf.DoubleValue", ScalarKind::Double),
    (".google.protobuf.FloatValue", ScalarKind::Float),
    (".google.protobuf.BoolValue", ScalarKind::Bool),
    (".google.protobuf.StringValue", ScalarKind::String),
    (".google.protobuf.BytesValue", ScalarKind::Bytes),
    // JSON renders these as RFC 3339 strings.
    (".google.protobuf.Duration", ScalarKind::String),
    (".google.protobuf.Timestamp", ScalarKind::String),
];

/// Scalar substitute for `type_name`, if it is a recognized well-known type.
pub fn scalar_for(type_name: &str) -> Option<ScalarKind> {
    WELL_KNOWN_SCALARS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, scalar)| *scalar)
}
