//! Conversion from protobuf descriptors into the [`model`](crate::model).
//!
//! Two sources are supported:
//!
//! - `prost_types` descriptors, as found in a `CodeGeneratorRequest` or a
//!   binary `FileDescriptorSet`;
//! - the JSON rendering of a descriptor set produced by
//!   `buf build --as-file-descriptor-set -o descriptor.json`. Only the subset
//!   of the JSON needed for schema generation is read.

use prost::Message as _;
use prost_types::field_descriptor_proto::{Label as ProtoLabel, Type as ProtoType};
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use serde::Deserialize;

use crate::error::DescriptorError;
use crate::model::{Enum, EnumValue, Field, FieldKind, Label, Message, ProtoFile, ScalarKind};

// =============================================================================
// prost descriptors
// =============================================================================

pub fn from_file_descriptors(files: &[FileDescriptorProto]) -> Result<Vec<ProtoFile>, DescriptorError> {
    files.iter().map(from_file_descriptor).collect()
}

pub fn from_file_descriptor(file: &FileDescriptorProto) -> Result<ProtoFile, DescriptorError> {
    Ok(ProtoFile {
        name: file.name().to_string(),
        package: file.package().to_string(),
        messages: file
            .message_type
            .iter()
            .map(from_message_descriptor)
            .collect::<Result<_, _>>()?,
        enums: file.enum_type.iter().map(from_enum_descriptor).collect(),
    })
}

/// Decodes a binary `google.protobuf.FileDescriptorSet`.
pub fn decode_descriptor_set(bytes: &[u8]) -> Result<Vec<ProtoFile>, DescriptorError> {
    let set = FileDescriptorSet::decode(bytes)?;
    from_file_descriptors(&set.file)
}

fn from_message_descriptor(message: &DescriptorProto) -> Result<Message, DescriptorError> {
    let fields = message
        .field
        .iter()
        .map(|f| from_field_descriptor(message.name(), f))
        .collect::<Result<_, _>>()?;
    Ok(Message {
        name: message.name().to_string(),
        fields,
        nested_messages: message
            .nested_type
            .iter()
            .map(from_message_descriptor)
            .collect::<Result<_, _>>()?,
        nested_enums: message.enum_type.iter().map(from_enum_descriptor).collect(),
    })
}

fn from_field_descriptor(owner: &str, field: &FieldDescriptorProto) -> Result<Field, DescriptorError> {
    let display = format!("{owner}.{}", field.name());
    let label = match field.label {
        None => None,
        Some(raw) => Some(ProtoLabel::try_from(raw).map_err(|_| DescriptorError::UnknownLabel {
            field: display.clone(),
            value: raw.to_string(),
        })?),
    };
    let ty = field
        .r#type
        .and_then(|raw| ProtoType::try_from(raw).ok())
        .ok_or_else(|| DescriptorError::UnknownFieldType {
            field: display.clone(),
            value: field.r#type.map(|raw| raw.to_string()).unwrap_or_default(),
        })?;

    Ok(Field {
        name: field.name().to_string(),
        number: field.number(),
        label: convert_label(label),
        kind: field_kind(&display, ty, field.type_name.as_deref())?,
    })
}

fn from_enum_descriptor(e: &EnumDescriptorProto) -> Enum {
    Enum {
        name: e.name().to_string(),
        values: e
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name().to_string(),
                number: v.number(),
            })
            .collect(),
    }
}

fn convert_label(label: Option<ProtoLabel>) -> Label {
    match label {
        None => Label::Singular,
        Some(ProtoLabel::Optional) => Label::Optional,
        Some(ProtoLabel::Required) => Label::Required,
        Some(ProtoLabel::Repeated) => Label::Repeated,
    }
}

fn field_kind(field: &str, ty: ProtoType, type_name: Option<&str>) -> Result<FieldKind, DescriptorError> {
    let scalar = match ty {
        ProtoType::Double => ScalarKind::Double,
        ProtoType::Float => ScalarKind::Float,
        ProtoType::Int64 => ScalarKind::Int64,
        ProtoType::Uint64 => ScalarKind::UInt64,
        ProtoType::Int32 => ScalarKind::Int32,
        ProtoType::Fixed64 => ScalarKind::Fixed64,
        ProtoType::Fixed32 => ScalarKind::Fixed32,
        ProtoType::Bool => ScalarKind::Bool,
        ProtoType::String => ScalarKind::String,
        ProtoType::Bytes => ScalarKind::Bytes,
        ProtoType::Uint32 => ScalarKind::UInt32,
        ProtoType::Sfixed32 => ScalarKind::SFixed32,
        ProtoType::Sfixed64 => ScalarKind::SFixed64,
        ProtoType::Sint32 => ScalarKind::SInt32,
        ProtoType::Sint64 => ScalarKind::SInt64,
        // Groups are messages on the wire; their type name points at the
        // generated nested message.
        ProtoType::Message | ProtoType::Group => {
            return Ok(FieldKind::Message(require_type_name(field, type_name)?));
        }
        ProtoType::Enum => return Ok(FieldKind::Enum(require_type_name(field, type_name)?)),
    };
    Ok(FieldKind::Scalar(scalar))
}

fn require_type_name(field: &str, type_name: Option<&str>) -> Result<String, DescriptorError> {
    type_name
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DescriptorError::MissingTypeName {
            field: field.to_string(),
        })
}

// =============================================================================
// Descriptor JSON (subset)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct FileDescriptorSetJson {
    #[serde(default)]
    file: Vec<FileDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct FileDescriptorProtoJson {
    name: Option<String>,
    package: Option<String>,
    #[serde(default, rename = "messageType")]
    message_type: Vec<DescriptorProtoJson>,
    #[serde(default, rename = "enumType")]
    enum_type: Vec<EnumDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct DescriptorProtoJson {
    name: Option<String>,
    #[serde(default)]
    field: Vec<FieldDescriptorProtoJson>,
    #[serde(default, rename = "nestedType")]
    nested_type: Vec<DescriptorProtoJson>,
    #[serde(default, rename = "enumType")]
    enum_type: Vec<EnumDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct FieldDescriptorProtoJson {
    name: Option<String>,
    number: Option<i32>,
    label: Option<String>,
    #[serde(rename = "type")]
    typ: Option<String>,
    #[serde(rename = "typeName")]
    type_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnumDescriptorProtoJson {
    name: Option<String>,
    #[serde(default)]
    value: Vec<EnumValueDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnumValueDescriptorProtoJson {
    name: Option<String>,
    number: Option<i32>,
}

/// Parses Buf's JSON descriptor set.
pub fn parse_descriptor_set_json(text: &str) -> Result<Vec<ProtoFile>, DescriptorError> {
    let set: FileDescriptorSetJson = serde_json::from_str(text)?;
    set.file
        .iter()
        .map(|file| -> Result<ProtoFile, DescriptorError> {
            Ok(ProtoFile {
                name: file.name.clone().unwrap_or_default(),
                package: file.package.clone().unwrap_or_default(),
                messages: file
                    .message_type
                    .iter()
                    .map(from_message_json)
                    .collect::<Result<_, _>>()?,
                enums: file.enum_type.iter().map(from_enum_json).collect(),
            })
        })
        .collect()
}

fn from_message_json(m: &DescriptorProtoJson) -> Result<Message, DescriptorError> {
    let name = m.name.clone().unwrap_or_default();
    let fields = m
        .field
        .iter()
        .map(|f| from_field_json(&name, f))
        .collect::<Result<_, _>>()?;
    Ok(Message {
        fields,
        nested_messages: m
            .nested_type
            .iter()
            .map(from_message_json)
            .collect::<Result<_, _>>()?,
        nested_enums: m.enum_type.iter().map(from_enum_json).collect(),
        name,
    })
}

fn from_field_json(owner: &str, f: &FieldDescriptorProtoJson) -> Result<Field, DescriptorError> {
    let name = f.name.clone().unwrap_or_default();
    let display = format!("{owner}.{name}");
    let label = match f.label.as_deref() {
        None => None,
        Some(raw) => Some(ProtoLabel::from_str_name(raw).ok_or_else(|| DescriptorError::UnknownLabel {
            field: display.clone(),
            value: raw.to_string(),
        })?),
    };
    let raw_type = f.typ.as_deref().unwrap_or_default();
    let ty = ProtoType::from_str_name(raw_type).ok_or_else(|| DescriptorError::UnknownFieldType {
        field: display.clone(),
        value: raw_type.to_string(),
    })?;

    Ok(Field {
        kind: field_kind(&display, ty, f.type_name.as_deref())?,
        name,
        number: f.number.unwrap_or_default(),
        label: convert_label(label),
    })
}

fn from_enum_json(e: &EnumDescriptorProtoJson) -> Enum {
    Enum {
        name: e.name.clone().unwrap_or_default(),
        values: e
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name.clone().unwrap_or_default(),
                number: v.number.unwrap_or_default(),
            })
            .collect(),
    }
}
