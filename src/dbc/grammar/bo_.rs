//! `BO_ <id> <name>: <byte_count> <sender>` plus nested `SG_` lines.

use crate::dbc::grammar::sg_;
use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::{RawDatabase, RawMessage};
use crate::types::errors::LoadError;

pub(crate) fn parse(scan: &mut Scanner, raw: &mut RawDatabase) -> Result<(), LoadError> {
    scan.skip_blanks();
    let id = scan.unsigned_u32()?;
    scan.skip_blanks();
    let name = scan.identifier()?.to_string();
    scan.skip_blanks();
    scan.expect_char(b':', "':'")?;
    scan.skip_blanks();
    let byte_count = scan.unsigned_u16()?;
    scan.skip_blanks();
    let sender = scan.identifier()?.to_string();
    scan.expect_eol()?;

    // Greedily consume the signal lines belonging to this message. The
    // lookahead is the block's only backtrack: a line whose first keyword is
    // not SG_ ends the block and is re-parsed by the document loop.
    let mut signals = Vec::new();
    loop {
        let mark = scan.pos();
        scan.skip_blank_lines();
        match scan.identifier() {
            Ok("SG_") => signals.push(sg_::parse(scan)?),
            _ => {
                scan.restore(mark);
                break;
            }
        }
    }

    raw.add_message(RawMessage {
        id,
        name,
        byte_count,
        sender,
        signals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_signals() {
        let text = " 64 EXTRM_TEMPS: 8 SENSOR\n\
                    \x20SG_ MAX_TEMP : 0|16@1+ (0.01,0) [0|0] \"C\" MASTER\n\
                    \x20SG_ MIN_TEMP : 16|16@1+ (0.01,0) [0|0] \"C\" MASTER\n\
                    BU_: MASTER\n";
        let mut scan = Scanner::new(text);
        let mut raw = RawDatabase::default();
        parse(&mut scan, &mut raw).unwrap();

        let message = raw.messages().next().unwrap();
        assert_eq!(message.id, 64);
        assert_eq!(message.name, "EXTRM_TEMPS");
        assert_eq!(message.byte_count, 8);
        assert_eq!(message.sender, "SENSOR");
        assert_eq!(message.signals.len(), 2);
        assert_eq!(message.signals[1].name, "MIN_TEMP");

        // The lookahead left BU_ for the document loop.
        let mut rest = scan;
        assert_eq!(rest.identifier().unwrap(), "BU_");
    }

    #[test]
    fn test_message_without_signals() {
        let mut scan = Scanner::new(" 256 HEARTBEAT: 1 MASTER\n");
        let mut raw = RawDatabase::default();
        parse(&mut scan, &mut raw).unwrap();
        assert!(raw.messages().next().unwrap().signals.is_empty());
    }

    #[test]
    fn test_duplicate_signal_name_is_fatal() {
        let text = " 64 T: 8 S\n\
                    \x20SG_ A : 0|8@1+ (1,0) [0|0] \"\" M\n\
                    \x20SG_ A : 8|8@1+ (1,0) [0|0] \"\" M\n";
        let mut raw = RawDatabase::default();
        assert!(matches!(
            parse(&mut Scanner::new(text), &mut raw),
            Err(LoadError::DuplicateSignal { message: 64, .. })
        ));
    }
}
