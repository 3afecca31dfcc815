//! `BS_ : [<speed>]`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    scan.expect_char(b':', "':'")?;
    scan.skip_blanks();

    let speed = match scan.peek() {
        Some(b) if b.is_ascii_digit() => Some(scan.unsigned_u32()?),
        _ => None,
    };
    scan.expect_eol()?;

    raw.add_speed(speed)
}
