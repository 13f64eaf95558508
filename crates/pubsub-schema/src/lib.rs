//! Pub/Sub schema generation from protobuf descriptors.
//!
//! Google Pub/Sub accepts protobuf schemas that declare exactly one top-level
//! message and import nothing. This crate turns an ordinary, fully-resolved
//! set of protobuf file descriptors into such schemas:
//!
//! - `descriptor` converts `prost_types` descriptors (or Buf's descriptor-set
//!   JSON) into the owned [`model`].
//! - `index` builds the immutable lookup of every message and enum by
//!   fully-qualified name.
//! - `compiler` renders one `.pps` schema per file, flattening every type
//!   that lives outside the top-level message into a uniquely named nested
//!   definition.
//! - `response` drives the compiler over the requested files.
//! - `plugin` is the `protoc` plugin envelope (`CodeGeneratorRequest` in,
//!   `CodeGeneratorResponse` out).
//!
//! ```rust,ignore
//! let index = TypeIndex::build(&files);
//! let options = CompilerOptions::from_parameter("schema-syntax=proto3")?;
//! let text = SchemaCompiler::new(&index, &options).compile(&files[0])?;
//! ```

pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod model;
pub mod options;
pub mod plugin;
pub mod response;
pub mod wkt;

pub use compiler::SchemaCompiler;
pub use error::{CompileError, DescriptorError, OptionsError, PluginError};
pub use index::TypeIndex;
pub use model::{Enum, EnumValue, Field, FieldKind, Label, Message, ProtoFile, ScalarKind};
pub use options::{CompilerOptions, Encoding, Syntax};
pub use response::{assemble, output_file_name, CodeGenRequest, CodeGenResponse, GeneratedFile};
