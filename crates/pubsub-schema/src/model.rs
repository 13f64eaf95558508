//! Owned view of the protobuf type universe.
//!
//! These types carry only what schema generation needs. Type references are
//! kept in descriptor form: fully qualified with a leading dot
//! (`.pkg.Outer.Inner`).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoFile {
    pub name: String,
    pub package: String,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
}

impl ProtoFile {
    /// Prefix shared by the fully-qualified names of every top-level type in
    /// this file: `.<package>`, or empty for the root package.
    pub fn scope(&self) -> String {
        if self.package.is_empty() {
            String::new()
        } else {
            format!(".{}", self.package)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub number: i32,
    pub label: Label,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// No explicit label in the descriptor.
    Singular,
    Optional,
    Required,
    Repeated,
}

impl Label {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Label::Singular => None,
            Label::Optional => Some("optional"),
            Label::Required => Some("required"),
            Label::Repeated => Some("repeated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Fully-qualified message name.
    Message(String),
    /// Fully-qualified enum name.
    Enum(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Float,
    Int64,
    UInt64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    UInt32,
    SFixed32,
    SFixed64,
    SInt32,
    SInt64,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 15] = [
        ScalarKind::Double,
        ScalarKind::Float,
        ScalarKind::Int64,
        ScalarKind::UInt64,
        ScalarKind::Int32,
        ScalarKind::Fixed64,
        ScalarKind::Fixed32,
        ScalarKind::Bool,
        ScalarKind::String,
        ScalarKind::Bytes,
        ScalarKind::UInt32,
        ScalarKind::SFixed32,
        ScalarKind::SFixed64,
        ScalarKind::SInt32,
        ScalarKind::SInt64,
    ];

    /// The `.proto` keyword for this scalar.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::Int32 => "int32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::SFixed32 => "sfixed32",
            ScalarKind::SFixed64 => "sfixed64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// Enclosing scope of a fully-qualified name (`.a.B.C` → `.a.B`).
pub fn parent_name(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(idx) => &type_name[..idx],
        None => "",
    }
}

/// Last segment of a fully-qualified name (`.a.B.C` → `C`).
pub fn local_name(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(idx) => &type_name[idx + 1..],
        None => type_name,
    }
}

/// Fully-qualified name of `name` declared inside `scope`.
pub fn qualify(scope: &str, name: &str) -> String {
    format!("{scope}.{name}")
}
