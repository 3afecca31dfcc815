//! `VERSION "<text>"`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let version = scan.quoted()?;
    scan.expect_eol()?;
    raw.add_version(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let mut scan = Scanner::new(" \"1.0.0\"\n");
        let mut raw = RawDatabase::default();
        parse(&mut scan, &mut raw).unwrap();
        assert_eq!(raw.version(), Some("1.0.0"));
    }

    #[test]
    fn test_version_requires_quotes() {
        let mut scan = Scanner::new(" 1.0\n");
        let mut raw = RawDatabase::default();
        assert!(parse(&mut scan, &mut raw).is_err());
    }

    #[test]
    fn test_duplicate_version_is_fatal() {
        let mut raw = RawDatabase::default();
        parse(&mut Scanner::new(" \"1\"\n"), &mut raw).unwrap();
        assert!(matches!(
            parse(&mut Scanner::new(" \"2\"\n"), &mut raw),
            Err(LoadError::DuplicateVersion)
        ));
    }
}
