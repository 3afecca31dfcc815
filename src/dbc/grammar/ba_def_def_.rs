//! `BA_DEF_DEF_ "<name>" <number|"string">;`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::dbc::types::attributes::AttributeDefault;
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let name = scan.quoted()?;
    scan.skip_blanks();

    let text = match scan.peek() {
        Some(b'"') => scan.quoted()?,
        _ => scan.number_text()?,
    };

    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_attribute_default(AttributeDefault { name, text })
}
