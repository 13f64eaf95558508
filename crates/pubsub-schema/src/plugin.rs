//! `protoc` plugin envelope.
//!
//! `protoc` writes an encoded `CodeGeneratorRequest` to the plugin's stdin
//! and reads an encoded `CodeGeneratorResponse` from its stdout. Problems with
//! the `.proto` files themselves (a file with two top-level messages, a bad
//! parameter value) are reported in the response's `error` field; a request
//! that cannot be decoded or is internally inconsistent is a [`PluginError`].

use prost::Message as _;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};

use crate::descriptor;
use crate::error::PluginError;
use crate::options::CompilerOptions;
use crate::response::{assemble, CodeGenRequest, CodeGenResponse};

/// Decodes `input`, generates schemas and returns the encoded response.
pub fn process(input: &[u8]) -> Result<Vec<u8>, PluginError> {
    let request = CodeGeneratorRequest::decode(input)?;
    let response = respond(&request)?;
    Ok(encode_response(response).encode_to_vec())
}

pub fn respond(request: &CodeGeneratorRequest) -> Result<CodeGenResponse, PluginError> {
    let options = match CompilerOptions::from_parameter(request.parameter()) {
        Ok(options) => options,
        Err(err) => return Ok(CodeGenResponse::from_error(err.to_string())),
    };

    let request = CodeGenRequest {
        files: descriptor::from_file_descriptors(&request.proto_file)?,
        file_to_generate: request.file_to_generate.clone(),
        options,
    };
    Ok(assemble(&request)?)
}

pub fn encode_response(response: CodeGenResponse) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: response.error,
        file: response
            .files
            .into_iter()
            .map(|file| code_generator_response::File {
                name: Some(file.name),
                content: Some(file.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::field_descriptor_proto::{Label, Type};
    use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

    fn user_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("a.proto".to_string()),
            package: Some("example".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("User".to_string()),
                field: vec![FieldDescriptorProto {
                    name: Some("name".to_string()),
                    number: Some(1),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::String as i32),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn bad_parameter_is_reported_in_response() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["a.proto".to_string()],
            parameter: Some("schema-syntax=proto4".to_string()),
            proto_file: vec![user_file()],
            ..Default::default()
        };

        let response = respond(&request).expect("respond");
        assert!(response.files.is_empty());
        assert!(response.error.expect("error").contains("proto4"));
    }

    #[test]
    fn undecodable_input_is_a_plugin_error() {
        let err = process(&[0xff, 0xff, 0xff]).expect_err("should fail");
        assert!(matches!(err, PluginError::Decode(_)));
    }

    #[test]
    fn encodes_files_with_names_and_content() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["a.proto".to_string()],
            proto_file: vec![user_file()],
            ..Default::default()
        };

        let encoded = encode_response(respond(&request).expect("respond"));
        assert_eq!(encoded.error, None);
        assert_eq!(encoded.file.len(), 1);
        assert_eq!(encoded.file[0].name.as_deref(), Some("a.pps"));
        assert_eq!(
            encoded.file[0].content.as_deref(),
            Some("syntax = \"proto2\";\n\nmessage User {\n  optional string name = 1;\n}\n")
        );
    }
}
