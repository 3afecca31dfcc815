//! `CM_ [BU_ <node>|BO_ <id>|SG_ <id> <signal>] "<text>";`
//!
//! Without an owner token the comment describes the database itself.

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::{Description, RawDatabase};
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();

    let description = match scan.peek() {
        Some(b'"') => Description::Database(scan.quoted()?),
        _ => {
            let owner = scan.identifier()?;
            match owner {
                "BU_" => {
                    scan.skip_blanks();
                    let node = scan.identifier()?.to_string();
                    scan.skip_blanks();
                    Description::Node {
                        node,
                        text: scan.quoted()?,
                    }
                }
                "BO_" => {
                    scan.skip_blanks();
                    let message = scan.unsigned_u32()?;
                    scan.skip_blanks();
                    Description::Message {
                        message,
                        text: scan.quoted()?,
                    }
                }
                "SG_" => {
                    scan.skip_blanks();
                    let message = scan.unsigned_u32()?;
                    scan.skip_blanks();
                    let signal = scan.identifier()?.to_string();
                    scan.skip_blanks();
                    Description::Signal {
                        message,
                        signal,
                        text: scan.quoted()?,
                    }
                }
                _ => return Err(scan.expected("description owner (BU_, BO_ or SG_)").into()),
            }
        }
    };

    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_description(description)
}
