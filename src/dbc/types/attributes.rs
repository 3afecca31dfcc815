//! Attribute definitions (`BA_DEF_`), defaults (`BA_DEF_DEF_`) and
//! assignments (`BA_`).
//!
//! Assignments carry raw text; they are only interpreted during model build,
//! once the matching definition is known (a valid file emits all definitions
//! before any assignment, but the accumulator does not rely on ordering).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::errors::LoadError;

/// The kind of object an attribute definition applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrObject {
    #[default]
    Database,
    Node,
    Message,
    Signal,
}

impl fmt::Display for AttrObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrObject::Database => "Database",
            AttrObject::Node => "Node",
            AttrObject::Message => "Message",
            AttrObject::Signal => "Signal",
        })
    }
}

/// Value kind and constraints of an attribute definition.
///
/// `min == max == 0` on the numeric kinds is the DBC sentinel for "no range
/// enforced", not a real `[0,0]` range. `HEX` definitions parse as `Integer`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeData {
    Integer { min: i64, max: i64 },
    Float { min: f32, max: f32 },
    String,
    Enum { values: Vec<String> },
}

/// A `BA_DEF_` line: named, typed, scoped to one object kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub object: AttrObject,
    pub data: AttributeData,
}

impl AttributeDefinition {
    /// Parses an assignment's text as a signed integer and range-checks it.
    ///
    /// Only meaningful for `Integer` definitions; the caller dispatches on
    /// [`AttributeData`] first.
    pub(crate) fn parse_integer(&self, min: i64, max: i64, text: &str) -> Result<i64, LoadError> {
        let value = text
            .parse::<i64>()
            .map_err(|_| LoadError::InvalidIntegerAttribute {
                name: self.name.clone(),
                text: text.to_string(),
            })?;

        if (min != 0 || max != 0) && (value < min || max < value) {
            return Err(LoadError::AttributeOutOfRange {
                name: self.name.clone(),
                object: self.object,
                text: text.to_string(),
            });
        }

        Ok(value)
    }

    /// Parses an assignment's text as a float and range-checks it.
    ///
    /// Faithful to the reference implementation, the parse *fails* when the
    /// numeric prefix consumes the entire text and succeeds only when
    /// trailing characters remain ("1.5x" resolves to 1.5, "1.5" is
    /// rejected). The check is inverted relative to the integer case; keep
    /// it that way until conformance against real `.dbc` corpora says
    /// otherwise.
    pub(crate) fn parse_float(&self, min: f32, max: f32, text: &str) -> Result<f32, LoadError> {
        let invalid = || LoadError::InvalidFloatAttribute {
            name: self.name.clone(),
            text: text.to_string(),
        };

        let (value, consumed) = float_prefix(text).ok_or_else(invalid)?;
        if consumed == text.len() {
            return Err(invalid());
        }

        if (min != 0.0 || max != 0.0) && (value < min || max < value) {
            return Err(LoadError::AttributeOutOfRange {
                name: self.name.clone(),
                object: self.object,
                text: text.to_string(),
            });
        }

        Ok(value)
    }

    /// Accepts an assignment's text only if it matches one of the allowed
    /// enum values exactly.
    pub(crate) fn parse_enum(&self, values: &[String], text: &str) -> Result<String, LoadError> {
        if values.iter().any(|v| v == text) {
            Ok(text.to_string())
        } else {
            Err(LoadError::InvalidEnumAttribute {
                name: self.name.clone(),
                text: text.to_string(),
            })
        }
    }
}

/// A `BA_DEF_DEF_` line: the default value text for a named attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefault {
    pub name: String,
    pub text: String,
}

/// Parses the leading `-?digits[.digits]` prefix of `text`.
///
/// Returns the value and the number of bytes consumed, or `None` when no
/// numeric prefix exists at all.
fn float_prefix(text: &str) -> Option<(f32, usize)> {
    let bytes = text.as_bytes();
    let mut end = 0usize;

    if bytes.first() == Some(&b'-') {
        end += 1;
    }
    let digits_start = end;
    while matches!(bytes.get(end), Some(b) if b.is_ascii_digit()) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while matches!(bytes.get(end), Some(b) if b.is_ascii_digit()) {
            end += 1;
        }
    }

    text[..end].parse::<f32>().ok().map(|value| (value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(data: AttributeData) -> AttributeDefinition {
        AttributeDefinition {
            name: "GenMsgCycleTime".to_string(),
            object: AttrObject::Message,
            data,
        }
    }

    #[test]
    fn test_integer_range_check() {
        let def = definition(AttributeData::Integer { min: 0, max: 100 });
        assert_eq!(def.parse_integer(0, 100, "50").unwrap(), 50);
        assert!(matches!(
            def.parse_integer(0, 100, "150"),
            Err(LoadError::AttributeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_integer_zero_zero_sentinel_disables_range() {
        let def = definition(AttributeData::Integer { min: 0, max: 0 });
        assert_eq!(def.parse_integer(0, 0, "123456").unwrap(), 123456);
        assert_eq!(def.parse_integer(0, 0, "-7").unwrap(), -7);
    }

    #[test]
    fn test_integer_requires_full_text() {
        let def = definition(AttributeData::Integer { min: 0, max: 0 });
        assert!(matches!(
            def.parse_integer(0, 0, "12x"),
            Err(LoadError::InvalidIntegerAttribute { .. })
        ));
    }

    #[test]
    fn test_float_inverted_consumption_check() {
        let def = definition(AttributeData::Float { min: 0.0, max: 0.0 });
        // Fully numeric text is rejected; trailing characters make it pass.
        assert!(matches!(
            def.parse_float(0.0, 0.0, "1.5"),
            Err(LoadError::InvalidFloatAttribute { .. })
        ));
        assert_eq!(def.parse_float(0.0, 0.0, "1.5x").unwrap(), 1.5);
        assert!(matches!(
            def.parse_float(0.0, 0.0, "CAN"),
            Err(LoadError::InvalidFloatAttribute { .. })
        ));
    }

    #[test]
    fn test_enum_exact_match() {
        let values = vec!["Yes".to_string(), "No".to_string()];
        let def = definition(AttributeData::Enum {
            values: values.clone(),
        });
        assert_eq!(def.parse_enum(&values, "No").unwrap(), "No");
        assert!(matches!(
            def.parse_enum(&values, "Maybe"),
            Err(LoadError::InvalidEnumAttribute { .. })
        ));
    }
}
