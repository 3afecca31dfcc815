//! `BU_ : <node> <node> ...`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    scan.expect_char(b':', "':'")?;
    scan.skip_blanks();

    let mut nodes = vec![scan.identifier()?.to_string()];
    loop {
        scan.skip_blanks();
        match scan.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                nodes.push(scan.identifier()?.to_string());
            }
            _ => break,
        }
    }
    scan.expect_eol()?;

    raw.add_nodes(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_list() {
        let mut raw = RawDatabase::default();
        parse(&mut Scanner::new(" : MASTER SENSOR FRONT_IO\n"), &mut raw).unwrap();
        assert_eq!(
            raw.node_names().unwrap(),
            ["MASTER", "SENSOR", "FRONT_IO"]
        );
    }

    #[test]
    fn test_node_list_requires_one_entry() {
        let mut raw = RawDatabase::default();
        assert!(parse(&mut Scanner::new(" :\n"), &mut raw).is_err());
    }
}
