//! Drives the compiler over the files a request asks for.

use std::collections::HashMap;

use crate::compiler::SchemaCompiler;
use crate::error::CompileError;
use crate::index::TypeIndex;
use crate::model::ProtoFile;
use crate::options::CompilerOptions;

pub const SOURCE_SUFFIX: &str = ".proto";
pub const SCHEMA_SUFFIX: &str = ".pps";

/// Everything one generation run needs, independent of the wire envelope.
#[derive(Debug, Clone, Default)]
pub struct CodeGenRequest {
    /// Every file needed to resolve the requested ones, imports included.
    pub files: Vec<ProtoFile>,
    /// Names of the files to produce schemas for, in output order.
    pub file_to_generate: Vec<String>,
    pub options: CompilerOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Either every requested schema, or a single error and no files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGenResponse {
    pub files: Vec<GeneratedFile>,
    pub error: Option<String>,
}

impl CodeGenResponse {
    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// `a/b.proto` → `a/b.pps`; names without the `.proto` suffix get `.pps`
/// appended.
pub fn output_file_name(source: &str) -> String {
    let stem = source.strip_suffix(SOURCE_SUFFIX).unwrap_or(source);
    format!("{stem}{SCHEMA_SUFFIX}")
}

/// Compiles every requested file in order.
///
/// The first shape error stops the batch and is returned as the response's
/// error with no files. Integrity errors (a requested file that was not
/// supplied, a reference to an undefined type) are returned as `Err`.
pub fn assemble(request: &CodeGenRequest) -> Result<CodeGenResponse, CompileError> {
    let index = TypeIndex::build(&request.files);
    let by_name: HashMap<&str, &ProtoFile> = request
        .files
        .iter()
        .map(|file| (file.name.as_str(), file))
        .collect();
    let compiler = SchemaCompiler::new(&index, &request.options);

    tracing::debug!(
        supplied = request.files.len(),
        requested = request.file_to_generate.len(),
        messages = index.message_count(),
        enums = index.enum_count(),
        syntax = %request.options.syntax,
        encoding = %request.options.encoding,
        "assembling response"
    );

    let mut files = Vec::with_capacity(request.file_to_generate.len());
    for name in &request.file_to_generate {
        let file = by_name
            .get(name.as_str())
            .copied()
            .ok_or_else(|| CompileError::UnknownFile { file: name.clone() })?;

        match compiler.compile(file) {
            Ok(content) => files.push(GeneratedFile {
                name: output_file_name(name),
                content,
            }),
            Err(err) if err.is_integrity() => return Err(err),
            Err(err) => {
                tracing::debug!(file = %name, error = %err, "aborting batch");
                return Ok(CodeGenResponse::from_error(err.to_string()));
            }
        }
    }

    Ok(CodeGenResponse { files, error: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, FieldKind, Label, Message, ScalarKind};

    fn single(name: &str, message: &str) -> ProtoFile {
        ProtoFile {
            name: name.to_string(),
            package: "example".to_string(),
            messages: vec![Message {
                name: message.to_string(),
                fields: vec![Field {
                    name: "id".to_string(),
                    number: 1,
                    label: Label::Optional,
                    kind: FieldKind::Scalar(ScalarKind::Int64),
                }],
                ..Message::default()
            }],
            enums: vec![],
        }
    }

    #[test]
    fn derives_output_names() {
        assert_eq!(output_file_name("a.proto"), "a.pps");
        assert_eq!(output_file_name("dir/sub/user.proto"), "dir/sub/user.pps");
        assert_eq!(output_file_name("noext"), "noext.pps");
        assert_eq!(output_file_name("a.proto.bak"), "a.proto.bak.pps");
    }

    #[test]
    fn compiles_requested_files_in_request_order() {
        let request = CodeGenRequest {
            files: vec![single("a.proto", "A"), single("b.proto", "B"), single("c.proto", "C")],
            file_to_generate: vec!["c.proto".to_string(), "a.proto".to_string()],
            options: CompilerOptions::default(),
        };

        let response = assemble(&request).expect("assemble");
        assert_eq!(response.error, None);
        let names: Vec<_> = response.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c.pps", "a.pps"]);
        assert!(response.files[0].content.contains("message C {"));
    }

    #[test]
    fn first_shape_error_discards_the_batch() {
        let mut two = single("two.proto", "First");
        two.messages.push(single("x", "Second").messages.remove(0));
        let request = CodeGenRequest {
            files: vec![single("a.proto", "A"), two, single("b.proto", "B")],
            file_to_generate: vec![
                "a.proto".to_string(),
                "two.proto".to_string(),
                "b.proto".to_string(),
            ],
            options: CompilerOptions::default(),
        };

        let response = assemble(&request).expect("assemble");
        assert!(response.files.is_empty());
        let error = response.error.expect("error");
        assert!(error.contains("two.proto"), "error={error}");
    }

    #[test]
    fn unsupplied_file_is_an_integrity_error() {
        let request = CodeGenRequest {
            files: vec![single("a.proto", "A")],
            file_to_generate: vec!["missing.proto".to_string()],
            options: CompilerOptions::default(),
        };

        let err = assemble(&request).expect_err("should fail");
        assert_eq!(
            err,
            CompileError::UnknownFile {
                file: "missing.proto".to_string()
            }
        );
    }
}
