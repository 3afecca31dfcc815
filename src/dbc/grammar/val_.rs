//! `VAL_ <message id> <signal> (<raw> "<label>" ... | <table name>);`

use crate::dbc::grammar::val_table_;
use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::{RawDatabase, ValueSource};
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let message = scan.unsigned_u32()?;
    scan.skip_blanks();
    let signal = scan.identifier()?.to_string();
    scan.skip_blanks();

    let source = match scan.peek() {
        Some(b) if b.is_ascii_digit() => ValueSource::Inline(val_table_::entries(scan)?),
        _ => ValueSource::Table(scan.identifier()?.to_string()),
    };

    scan.skip_blanks();
    scan.expect_char(b';', "';'")?;
    scan.expect_eol()?;

    raw.add_value_definitions(message, signal, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_values() {
        let mut raw = RawDatabase::default();
        parse(
            &mut Scanner::new(" 1 AIRS_STATE 0 \"OPEN\" 1 \"CLOSED\";\n"),
            &mut raw,
        )
        .unwrap();
        let values = raw.signal_values(1, "AIRS_STATE");
        assert_eq!(values.get(&1).map(String::as_str), Some("CLOSED"));
    }

    #[test]
    fn test_named_table_reference() {
        let mut raw = RawDatabase::default();
        parse(
            &mut Scanner::new(" 768 TEMPS_MODULE MODULE_NAMES;\n"),
            &mut raw,
        )
        .unwrap();
        // Table not defined (yet): labels resolve to nothing, not an error.
        assert!(raw.signal_values(768, "TEMPS_MODULE").is_empty());
    }

    #[test]
    fn test_duplicate_value_definitions_are_fatal() {
        let mut raw = RawDatabase::default();
        parse(&mut Scanner::new(" 1 S 0 \"A\";\n"), &mut raw).unwrap();
        assert!(matches!(
            parse(&mut Scanner::new(" 1 S 0 \"B\";\n"), &mut raw),
            Err(LoadError::DuplicateValueDefinitions { .. })
        ));
    }
}
