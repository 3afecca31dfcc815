//! `NS_ :` followed by one indented keyword per line.
//!
//! The block has no terminator of its own: it extends over every following
//! line that starts with horizontal whitespace and carries an identifier.

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    scan.expect_char(b':', "':'")?;
    scan.expect_eol()?;

    let mut requirements = Vec::new();
    loop {
        if !matches!(scan.peek(), Some(b' ' | b'\t')) {
            break;
        }
        let mark = scan.pos();
        scan.skip_blanks();
        match scan.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
            _ => {
                scan.restore(mark);
                break;
            }
        }
        requirements.push(scan.identifier()?.to_string());
        scan.expect_eol()?;
    }

    raw.add_requirements(requirements)
}
