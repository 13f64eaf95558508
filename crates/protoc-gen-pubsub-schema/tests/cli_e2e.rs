use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use prost::Message as _;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};

fn plugin_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_protoc-gen-pubsub-schema"))
}

fn field(name: &str, number: i32, label: Label, ty: Type, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        type_name: type_name.map(str::to_string),
        ..Default::default()
    }
}

fn descriptor_files() -> Vec<FileDescriptorProto> {
    vec![
        FileDescriptorProto {
            name: Some("events/click.proto".to_string()),
            package: Some("events".to_string()),
            dependency: vec!["google/protobuf/timestamp.proto".to_string()],
            message_type: vec![DescriptorProto {
                name: Some("Click".to_string()),
                field: vec![
                    field("target", 1, Label::Optional, Type::String, None),
                    field("at", 2, Label::Optional, Type::Message, Some(".google.protobuf.Timestamp")),
                ],
                ..Default::default()
            }],
            ..Default::default()
        },
        FileDescriptorProto {
            name: Some("google/protobuf/timestamp.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Timestamp".to_string()),
                field: vec![
                    field("seconds", 1, Label::Optional, Type::Int64, None),
                    field("nanos", 2, Label::Optional, Type::Int32, None),
                ],
                ..Default::default()
            }],
            ..Default::default()
        },
    ]
}

#[test]
fn plugin_mode_round_trips_through_stdin_and_stdout() {
    let request = CodeGeneratorRequest {
        file_to_generate: vec!["events/click.proto".to_string()],
        parameter: Some("schema-syntax=proto3,message-encoding=json".to_string()),
        proto_file: descriptor_files(),
        ..Default::default()
    };

    let mut child = Command::new(plugin_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn plugin");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&request.encode_to_vec())
        .expect("write request");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));

    let response = CodeGeneratorResponse::decode(output.stdout.as_slice()).expect("decode response");
    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name(), "events/click.pps");
    assert_eq!(
        response.file[0].content(),
        "syntax = \"proto3\";\n\nmessage Click {\n  string target = 1;\n  string at = 2;\n}\n"
    );
}

#[test]
fn plugin_mode_fails_on_garbage_input() {
    let mut child = Command::new(plugin_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn plugin");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&[0xff, 0xff, 0xff])
        .expect("write request");
    let output = child.wait_with_output().expect("wait");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn compile_command_reads_binary_descriptor_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let set_path = dir.path().join("set.binpb");
    let set = FileDescriptorSet {
        file: descriptor_files(),
    };
    fs::write(&set_path, set.encode_to_vec()).expect("write set");
    let out_dir = dir.path().join("out");

    let output = Command::new(plugin_bin())
        .arg("compile")
        .arg("--descriptor-set")
        .arg(&set_path)
        .arg("--file")
        .arg("events/click.proto")
        .arg("--out")
        .arg(&out_dir)
        .output()
        .expect("run compile");
    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(out_dir.join("events/click.pps")).expect("read output");
    assert_eq!(
        text,
        "syntax = \"proto2\";\n\n\
         message Click {\n\
         \x20 optional string target = 1;\n\
         \x20 optional GoogleProtobufTimestamp at = 2;\n\
         \n\
         \x20 message GoogleProtobufTimestamp {\n\
         \x20   optional int64 seconds = 1;\n\
         \x20   optional int32 nanos = 2;\n\
         \x20 }\n\
         }\n"
    );
}

#[test]
fn compile_command_reads_buf_json_and_reports_shape_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let set_path = dir.path().join("set.json");
    fs::write(
        &set_path,
        r#"{"file":[{"name":"two.proto","package":"p","messageType":[{"name":"A"},{"name":"B"}]}]}"#,
    )
    .expect("write set");

    let output = Command::new(plugin_bin())
        .args(["compile", "--file", "two.proto", "--syntax", "proto3", "--out"])
        .arg(dir.path().join("out"))
        .arg("--descriptor-set")
        .arg(&set_path)
        .output()
        .expect("run compile");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("two.proto"), "stderr={stderr}");
    assert!(!dir.path().join("out/two.pps").exists());
}
