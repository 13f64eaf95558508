//! Lookup of every message and enum in a request by fully-qualified name.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::model::{qualify, Enum, Message, ProtoFile};

/// Immutable index over a borrowed set of files.
///
/// Built once per request from *all* supplied files, including those that are
/// only imported, and shared read-only by every compilation.
#[derive(Debug, Default)]
pub struct TypeIndex<'a> {
    messages: HashMap<String, &'a Message>,
    enums: HashMap<String, &'a Enum>,
}

impl<'a> TypeIndex<'a> {
    pub fn build(files: &'a [ProtoFile]) -> Self {
        let mut index = Self::default();
        for file in files {
            let scope = file.scope();
            for message in &file.messages {
                index.insert_message(&scope, message);
            }
            for e in &file.enums {
                index.insert_enum(&scope, e);
            }
        }
        index
    }

    fn insert_message(&mut self, scope: &str, message: &'a Message) {
        let fqn = qualify(scope, &message.name);
        for nested in &message.nested_messages {
            self.insert_message(&fqn, nested);
        }
        for e in &message.nested_enums {
            self.insert_enum(&fqn, e);
        }
        if self.messages.contains_key(&fqn) {
            tracing::warn!(type_name = %fqn, "duplicate message definition; keeping the first");
            return;
        }
        self.messages.insert(fqn, message);
    }

    fn insert_enum(&mut self, scope: &str, e: &'a Enum) {
        let fqn = qualify(scope, &e.name);
        if self.enums.contains_key(&fqn) {
            tracing::warn!(type_name = %fqn, "duplicate enum definition; keeping the first");
            return;
        }
        self.enums.insert(fqn, e);
    }

    pub fn message(&self, type_name: &str) -> Result<&'a Message, CompileError> {
        self.messages
            .get(type_name)
            .copied()
            .ok_or_else(|| CompileError::UnresolvedType {
                type_name: type_name.to_string(),
            })
    }

    pub fn enumeration(&self, type_name: &str) -> Result<&'a Enum, CompileError> {
        self.enums
            .get(type_name)
            .copied()
            .ok_or_else(|| CompileError::UnresolvedType {
                type_name: type_name.to_string(),
            })
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }
}
