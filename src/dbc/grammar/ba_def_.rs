//! `BA_DEF_ [BU_|BO_|SG_] "<name>" INT|HEX|FLOAT|STRING|ENUM ...;`
//!
//! No owner token scopes the definition to the database itself. `HEX` is
//! treated exactly like `INT`. Missing numeric bounds default to the `0 0`
//! no-range sentinel.

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::dbc::types::attributes::{AttrObject, AttributeData, AttributeDefinition};
use crate::types::errors::{LoadError, ParseError};

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();

    let object = match scan.peek() {
        Some(b'"') => AttrObject::Database,
        _ => match scan.identifier()? {
            "BU_" => AttrObject::Node,
            "BO_" => AttrObject::Message,
            "SG_" => AttrObject::Signal,
            _ => {
                return Err(scan
                    .expected("attribute object (BU_, BO_ or SG_)")
                    .into());
            }
        },
    };

    scan.skip_blanks();
    let name = scan.quoted()?;
    scan.skip_blanks();

    let data = match scan.identifier()? {
        "INT" | "HEX" => {
            let (min, max) = integer_bounds(scan)?;
            AttributeData::Integer { min, max }
        }
        "FLOAT" => {
            let (min, max) = float_bounds(scan)?;
            AttributeData::Float { min, max }
        }
        "STRING" => {
            // An optional quoted default may trail the keyword; it carries no
            // constraint and is dropped.
            scan.skip_blanks();
            if scan.peek() == Some(b'"') {
                scan.quoted()?;
            }
            AttributeData::String
        }
        "ENUM" => {
            let mut values = Vec::new();
            scan.skip_blanks();
            if scan.peek() == Some(b'"') {
                values.push(scan.quoted()?);
                loop {
                    scan.skip_blanks();
                    if scan.peek() != Some(b',') {
                        break;
                    }
                    scan.expect_char(b',', "','")?;
                    scan.skip_blanks();
                    values.push(scan.quoted()?);
                }
            }
            AttributeData::Enum { values }
        }
        _ => {
            return Err(scan
                .expected("attribute type (INT, HEX, FLOAT, STRING or ENUM)")
                .into());
        }
    };

    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_attribute_definition(AttributeDefinition { name, object, data })
}

fn integer_bounds(scan: &mut Scanner) -> Result<(i64, i64), ParseError> {
    scan.skip_blanks();
    match scan.peek() {
        Some(b) if b == b'-' || b.is_ascii_digit() => {
            let min = scan.integer()?;
            scan.skip_blanks();
            let max = scan.integer()?;
            Ok((min, max))
        }
        _ => Ok((0, 0)),
    }
}

fn float_bounds(scan: &mut Scanner) -> Result<(f32, f32), ParseError> {
    scan.skip_blanks();
    match scan.peek() {
        Some(b) if b == b'-' || b.is_ascii_digit() => {
            let min = scan.float()?;
            scan.skip_blanks();
            let max = scan.float()?;
            Ok((min, max))
        }
        _ => Ok((0.0, 0.0)),
    }
}
