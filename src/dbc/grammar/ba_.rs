//! `BA_ "<name>" [BU_ <node>|BO_ <id>|SG_ <id> <signal>] <number|"string">;`
//!
//! The value is captured as raw text; interpretation waits for the matching
//! `BA_DEF_` at model build. Duplicate assignments are ignored here.

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::{AttributeAssignment, RawDatabase};
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let name = scan.quoted()?;
    scan.skip_blanks();

    // An owner token is an identifier; a database-level value starts with a
    // digit, '-' or a quote, so one peek disambiguates.
    let assignment = match scan.peek() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => match scan.identifier()? {
            "BU_" => {
                scan.skip_blanks();
                let node = scan.identifier()?.to_string();
                scan.skip_blanks();
                AttributeAssignment::Node {
                    name,
                    node,
                    text: value_text(scan)?,
                }
            }
            "BO_" => {
                scan.skip_blanks();
                let message = scan.unsigned_u32()?;
                scan.skip_blanks();
                AttributeAssignment::Message {
                    name,
                    message,
                    text: value_text(scan)?,
                }
            }
            "SG_" => {
                scan.skip_blanks();
                let message = scan.unsigned_u32()?;
                scan.skip_blanks();
                let signal = scan.identifier()?.to_string();
                scan.skip_blanks();
                AttributeAssignment::Signal {
                    name,
                    message,
                    signal,
                    text: value_text(scan)?,
                }
            }
            _ => return Err(scan.expected("attribute owner (BU_, BO_ or SG_)").into()),
        },
        _ => AttributeAssignment::Database {
            name,
            text: value_text(scan)?,
        },
    };

    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_attribute(assignment);
    Ok(())
}

fn value_text(scan: &mut Scanner) -> Result<String, LoadError> {
    let text = match scan.peek() {
        Some(b'"') => scan.quoted()?,
        _ => scan.number_text()?,
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::ast::AttrOwner;
    use crate::dbc::types::attributes::{AttrObject, AttributeData, AttributeDefinition};

    fn define(raw: &mut RawDatabase, name: &str, object: AttrObject) {
        raw.add_attribute_definition(AttributeDefinition {
            name: name.to_string(),
            object,
            data: AttributeData::Integer { min: 0, max: 0 },
        })
        .unwrap();
    }

    #[test]
    fn test_message_assignment() {
        let mut raw = RawDatabase::default();
        define(&mut raw, "GenMsgCycleTime", AttrObject::Message);
        parse(
            &mut Scanner::new(" \"GenMsgCycleTime\" BO_ 64 500;\n"),
            &mut raw,
        )
        .unwrap();

        let integers = raw.integer_attributes(AttrOwner::Message(64)).unwrap();
        assert_eq!(integers.get("GenMsgCycleTime"), Some(&500));
    }

    #[test]
    fn test_signal_and_node_assignments() {
        let mut raw = RawDatabase::default();
        define(&mut raw, "SigStartValue", AttrObject::Signal);
        define(&mut raw, "NodeAddress", AttrObject::Node);
        parse(
            &mut Scanner::new(" \"SigStartValue\" SG_ 64 MAX_TEMP 25;\n"),
            &mut raw,
        )
        .unwrap();
        parse(
            &mut Scanner::new(" \"NodeAddress\" BU_ MASTER 1;\n"),
            &mut raw,
        )
        .unwrap();

        let signal = raw
            .integer_attributes(AttrOwner::Signal(64, "MAX_TEMP"))
            .unwrap();
        assert_eq!(signal.get("SigStartValue"), Some(&25));
        let node = raw.integer_attributes(AttrOwner::Node("MASTER")).unwrap();
        assert_eq!(node.get("NodeAddress"), Some(&1));
    }

    #[test]
    fn test_database_assignment_with_string_value() {
        let mut raw = RawDatabase::default();
        raw.add_attribute_definition(AttributeDefinition {
            name: "BusType".to_string(),
            object: AttrObject::Database,
            data: AttributeData::String,
        })
        .unwrap();
        parse(&mut Scanner::new(" \"BusType\" \"CAN\";\n"), &mut raw).unwrap();

        let strings = raw.string_attributes(AttrOwner::Database).unwrap();
        assert_eq!(strings.get("BusType").map(String::as_str), Some("CAN"));
    }
}
