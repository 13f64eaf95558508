//! Schema compiler: one protobuf file in, one flattened `.pps` schema out.
//!
//! Pub/Sub schemas hold a single top-level message and cannot import. Every
//! field type is therefore resolved in one of three ways, relative to the
//! message being rendered:
//!
//! 1. declared directly inside that message: referenced by its short name
//!    and rendered by the nested-type pass;
//! 2. a well-known wrapper or temporal type under JSON encoding: replaced by
//!    its scalar;
//! 3. anything else: *flattened*. The type is copied in as a nested
//!    definition under a name derived from its fully-qualified name
//!    (`.pkg.Foo.Bar` → `PkgFooBar`).
//!
//! Each flattened type is a *debt*. Debts are deduplicated across the whole
//! output file: the first reference assigns the name and schedules the
//! definition under the message that made it, later references reuse the
//! name. A flattened message resolves its own fields the same way, so the
//! dependency graph is pulled in transitively, in first-reference order.
//!
//! Example:
//!
//! ```text
//! // a.proto                       // a.pps
//! package shop;                    syntax = "proto3";
//! import "common.proto";
//! message Order {                  message Order {
//!   common.Money total = 1;          CommonMoney total = 1;
//!   common.Money tax = 2;            CommonMoney tax = 2;
//! }
//!                                    message CommonMoney {
//!                                      int64 units = 1;
//!                                    }
//!                                  }
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use crate::error::CompileError;
use crate::index::TypeIndex;
use crate::model::{local_name, parent_name, qualify, Enum, Field, FieldKind, Label, Message, ProtoFile};
use crate::options::{CompilerOptions, Encoding, Syntax};
use crate::wkt;

const INDENT: &str = "  ";

/// Renders schemas against a shared, immutable [`TypeIndex`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'i, 'a> {
    index: &'i TypeIndex<'a>,
    options: CompilerOptions,
}

impl<'i, 'a> SchemaCompiler<'i, 'a> {
    pub fn new(index: &'i TypeIndex<'a>, options: &CompilerOptions) -> Self {
        Self {
            index,
            options: *options,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compiles `file` into schema text. Fails without partial output.
    pub fn compile(&self, file: &ProtoFile) -> Result<String, CompileError> {
        let [message] = file.messages.as_slice() else {
            return Err(CompileError::Shape {
                file: file.name.clone(),
                found: file.messages.len(),
            });
        };

        let mut unit = Unit {
            index: self.index,
            options: self.options,
            debts: DebtTable::default(),
            out: String::new(),
        };
        unit.line(0, format_args!("syntax = \"{}\";", self.options.syntax));
        unit.out.push('\n');
        let fqn = qualify(&file.scope(), &message.name);
        unit.render_message(message, &fqn, &message.name, 0)?;

        tracing::debug!(
            file = %file.name,
            flattened = unit.debts.len(),
            "compiled schema"
        );
        Ok(unit.out)
    }
}

// =============================================================================
// Debts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebtKind {
    Message,
    Enum,
}

/// A flattened type scheduled under the message that first referenced it.
#[derive(Debug, Clone)]
struct Debt {
    type_name: String,
    local_name: String,
    kind: DebtKind,
}

/// Names assigned to flattened types, scoped to one output file.
#[derive(Debug, Default)]
struct DebtTable {
    assigned: HashMap<String, String>,
}

impl DebtTable {
    /// Returns the local name for `type_name` and whether this call created
    /// the debt.
    fn resolve(&mut self, type_name: &str) -> (String, bool) {
        if let Some(existing) = self.assigned.get(type_name) {
            return (existing.clone(), false);
        }
        let local = flattened_name(type_name);
        self.assigned.insert(type_name.to_string(), local.clone());
        (local, true)
    }

    fn len(&self) -> usize {
        self.assigned.len()
    }
}

/// Local name for a flattened type: separators dropped, the character after
/// each one upper-cased (`.pkg.Foo.Bar` → `PkgFooBar`).
pub fn flattened_name(type_name: &str) -> String {
    let mut name = String::with_capacity(type_name.len());
    let mut upper_next = false;
    for c in type_name.chars() {
        if c == '.' {
            upper_next = true;
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}

// =============================================================================
// Rendering
// =============================================================================

/// State of one file compilation.
struct Unit<'i, 'a> {
    index: &'i TypeIndex<'a>,
    options: CompilerOptions,
    debts: DebtTable,
    out: String,
}

impl Unit<'_, '_> {
    fn line(&mut self, level: usize, text: fmt::Arguments<'_>) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(text);
        self.out.push('\n');
    }

    /// Renders `message` (whose original fully-qualified name is `scope`)
    /// as `display_name` at `level`.
    fn render_message(
        &mut self,
        message: &Message,
        scope: &str,
        display_name: &str,
        level: usize,
    ) -> Result<(), CompileError> {
        self.line(level, format_args!("message {display_name} {{"));

        let mut incurred = Vec::new();
        for field in &message.fields {
            let type_ref = self.resolve_type(field, scope, &mut incurred)?;
            let label = self.label_prefix(field.label);
            self.line(
                level + 1,
                format_args!("{label}{type_ref} {} = {};", field.name, field.number),
            );
        }

        for nested in &message.nested_messages {
            let nested_scope = qualify(scope, &nested.name);
            self.render_message(nested, &nested_scope, &nested.name, level + 1)?;
        }
        for e in &message.nested_enums {
            self.render_enum(e, &e.name, level + 1);
        }

        for debt in incurred {
            self.out.push('\n');
            match debt.kind {
                DebtKind::Message => {
                    let flattened = self.index.message(&debt.type_name)?;
                    self.render_message(flattened, &debt.type_name, &debt.local_name, level + 1)?;
                }
                DebtKind::Enum => {
                    let flattened = self.index.enumeration(&debt.type_name)?;
                    self.render_enum(flattened, &debt.local_name, level + 1);
                }
            }
        }

        self.line(level, format_args!("}}"));
        Ok(())
    }

    fn render_enum(&mut self, e: &Enum, display_name: &str, level: usize) {
        self.line(level, format_args!("enum {display_name} {{"));
        for value in &e.values {
            self.line(level + 1, format_args!("{} = {};", value.name, value.number));
        }
        self.line(level, format_args!("}}"));
    }

    fn label_prefix(&self, label: Label) -> &'static str {
        match (label, self.options.syntax) {
            (Label::Repeated, _) => "repeated ",
            (Label::Required, Syntax::Proto2) => "required ",
            (Label::Optional | Label::Singular, Syntax::Proto2) => "optional ",
            (_, Syntax::Proto3) => "",
        }
    }

    /// Rendered type of `field` declared in the message whose original
    /// fully-qualified name is `scope`. New debts are pushed to `incurred`.
    fn resolve_type(
        &mut self,
        field: &Field,
        scope: &str,
        incurred: &mut Vec<Debt>,
    ) -> Result<String, CompileError> {
        let (type_name, kind) = match &field.kind {
            FieldKind::Scalar(scalar) => return Ok(scalar.keyword().to_string()),
            FieldKind::Message(name) => (name.as_str(), DebtKind::Message),
            FieldKind::Enum(name) => (name.as_str(), DebtKind::Enum),
        };

        if parent_name(type_name) == scope {
            self.ensure_defined(type_name, kind)?;
            return Ok(local_name(type_name).to_string());
        }

        if self.options.encoding == Encoding::Json {
            if let Some(scalar) = wkt::scalar_for(type_name) {
                return Ok(scalar.keyword().to_string());
            }
        }

        let (local, created) = self.debts.resolve(type_name);
        if created {
            self.ensure_defined(type_name, kind)?;
            tracing::debug!(type_name, local_name = %local, "flattening external type");
            incurred.push(Debt {
                type_name: type_name.to_string(),
                local_name: local.clone(),
                kind,
            });
        }
        Ok(local)
    }

    fn ensure_defined(&self, type_name: &str, kind: DebtKind) -> Result<(), CompileError> {
        match kind {
            DebtKind::Message => self.index.message(type_name).map(|_| ()),
            DebtKind::Enum => self.index.enumeration(type_name).map(|_| ()),
        }
    }
}
