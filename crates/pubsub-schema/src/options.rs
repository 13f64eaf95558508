//! Request-level compiler options and plugin parameter parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::OptionsError;

pub const KEY_SCHEMA_SYNTAX: &str = "schema-syntax";
pub const KEY_MESSAGE_ENCODING: &str = "message-encoding";

/// Syntax of the generated schema, independent of the source files' syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Syntax {
    #[default]
    Proto2,
    Proto3,
}

impl Syntax {
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Proto2 => "proto2",
            Syntax::Proto3 => "proto3",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proto2" => Ok(Syntax::Proto2),
            "proto3" => Ok(Syntax::Proto3),
            other => Err(OptionsError::InvalidValue {
                key: KEY_SCHEMA_SYNTAX.to_string(),
                value: other.to_string(),
                expected: "proto2, proto3",
            }),
        }
    }
}

/// Message encoding the topic uses. Under JSON, well-known wrapper and
/// temporal types collapse to scalars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Binary,
    Json,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Binary => "binary",
            Encoding::Json => "json",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Encoding::Binary),
            "json" => Ok(Encoding::Json),
            other => Err(OptionsError::InvalidValue {
                key: KEY_MESSAGE_ENCODING.to_string(),
                value: other.to_string(),
                expected: "binary, json",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub syntax: Syntax,
    pub encoding: Encoding,
}

impl CompilerOptions {
    pub fn new(syntax: Syntax, encoding: Encoding) -> Self {
        Self { syntax, encoding }
    }

    /// Parses a `protoc` plugin parameter such as
    /// `schema-syntax=proto3,message-encoding=json`.
    ///
    /// Unknown keys and bare flags are ignored so the plugin can share a
    /// parameter string with other generators. A later occurrence of a key
    /// overrides an earlier one.
    pub fn from_parameter(parameter: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        for item in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((key, value)) = item.split_once('=') else {
                tracing::debug!(parameter = item, "ignoring bare plugin parameter");
                continue;
            };
            match key.trim() {
                KEY_SCHEMA_SYNTAX => options.syntax = value.trim().parse()?,
                KEY_MESSAGE_ENCODING => options.encoding = value.trim().parse()?,
                other => tracing::debug!(key = other, "ignoring unknown plugin parameter"),
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parameter_uses_defaults() {
        let options = CompilerOptions::from_parameter("").expect("parse");
        assert_eq!(options.syntax, Syntax::Proto2);
        assert_eq!(options.encoding, Encoding::Binary);
    }

    #[test]
    fn parses_both_keys_among_foreign_parameters() {
        let options =
            CompilerOptions::from_parameter("paths=source_relative, schema-syntax=proto3,message-encoding=json,verbose")
                .expect("parse");
        assert_eq!(options, CompilerOptions::new(Syntax::Proto3, Encoding::Json));
    }

    #[test]
    fn later_value_wins() {
        let options =
            CompilerOptions::from_parameter("schema-syntax=proto3,schema-syntax=proto2").expect("parse");
        assert_eq!(options.syntax, Syntax::Proto2);
    }

    #[test]
    fn rejects_unknown_value_for_known_key() {
        let err = CompilerOptions::from_parameter("message-encoding=avro").expect_err("should error");
        let text = err.to_string();
        assert!(text.contains("message-encoding"), "err={text}");
        assert!(text.contains("avro"), "err={text}");
    }

    #[test]
    fn display_matches_parse() {
        for syntax in [Syntax::Proto2, Syntax::Proto3] {
            assert_eq!(syntax.to_string().parse::<Syntax>().expect("parse"), syntax);
        }
        for encoding in [Encoding::Binary, Encoding::Json] {
            assert_eq!(encoding.to_string().parse::<Encoding>().expect("parse"), encoding);
        }
    }
}
