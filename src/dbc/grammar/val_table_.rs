//! `VAL_TABLE_ <name> <raw> "<label>" ...;`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::errors::{LoadError, ParseError};

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let name = scan.identifier()?.to_string();
    let entries = entries(scan)?;
    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_value_table(name, entries)
}

/// `<raw> "<label>"` pairs, at least one. Shared with the inline form of
/// `VAL_`.
pub(crate) fn entries(scan: &mut Scanner) -> Result<Vec<(u64, String)>, ParseError> {
    let mut entries = Vec::new();
    loop {
        scan.skip_blanks();
        match scan.peek() {
            Some(b) if b.is_ascii_digit() => {}
            _ if entries.is_empty() => return Err(scan.expected("value table entry")),
            _ => break,
        }
        let value = scan.unsigned()?;
        scan.skip_blanks();
        let label = scan.quoted()?;
        entries.push((value, label));
    }
    Ok(entries)
}
