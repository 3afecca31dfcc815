//! `SG_ <name> [m<sel>|M] : <start>|<count>@<order><sign> (<scale>,<offset>) [<min>|<max>] "<unit>" <rx>,<rx>...`

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawSignal;
use crate::types::errors::ParseError;
use crate::types::signal::{ByteOrder, MuxRole};

pub(crate) fn parse(scan: &mut Scanner) -> Result<RawSignal, ParseError> {
    scan.skip_blanks();
    let name = scan.identifier()?.to_string();
    scan.skip_blanks();

    // Multiplexing token. A lowercase 'm' must be followed by the selector
    // digits; an uppercase 'M' must not be (the colon check below rejects
    // 'M<digits>', a signal cannot be both multiplexer and multiplexed).
    let mux = match scan.peek() {
        Some(b'm') => {
            scan.expect_char(b'm', "'m'")?;
            MuxRole::MultiplexedBy(scan.unsigned_u16()?)
        }
        Some(b'M') => {
            scan.expect_char(b'M', "'M'")?;
            MuxRole::Multiplexer
        }
        _ => MuxRole::NotMultiplexed,
    };

    scan.skip_blanks();
    scan.expect_char(b':', "':'")?;
    scan.skip_blanks();

    let bit_start = scan.unsigned_u16()?;
    scan.expect_char(b'|', "'|'")?;
    let bit_count = scan.unsigned_u16()?;
    scan.expect_char(b'@', "'@'")?;
    let byte_order = match scan.peek() {
        Some(b'0') => ByteOrder::Big,
        Some(b'1') => ByteOrder::Little,
        _ => return Err(scan.expected("byte order ('0' or '1')")),
    };
    scan.expect_char(byte_order_byte(byte_order), "byte order")?;
    let is_signed = match scan.peek() {
        Some(b'-') => true,
        Some(b'+') => false,
        _ => return Err(scan.expected("sign ('+' or '-')")),
    };
    scan.expect_char(if is_signed { b'-' } else { b'+' }, "sign")?;

    scan.skip_blanks();
    scan.expect_char(b'(', "'('")?;
    let scale = scan.float()?;
    scan.expect_char(b',', "','")?;
    let offset = scan.float()?;
    scan.expect_char(b')', "')'")?;

    scan.skip_blanks();
    scan.expect_char(b'[', "'['")?;
    let min = scan.float()?;
    scan.expect_char(b'|', "'|'")?;
    let max = scan.float()?;
    scan.expect_char(b']', "']'")?;

    scan.skip_blanks();
    let unit = scan.quoted()?;

    scan.skip_blanks();
    let mut receivers = vec![scan.identifier()?.to_string()];
    loop {
        scan.skip_blanks();
        if scan.peek() != Some(b',') {
            break;
        }
        scan.expect_char(b',', "','")?;
        scan.skip_blanks();
        receivers.push(scan.identifier()?.to_string());
    }
    scan.expect_eol()?;

    Ok(RawSignal {
        name,
        bit_start,
        bit_count,
        byte_order,
        is_signed,
        scale,
        offset,
        min,
        max,
        unit,
        receivers,
        mux,
    })
}

fn byte_order_byte(order: ByteOrder) -> u8 {
    match order {
        ByteOrder::Big => b'0',
        ByteOrder::Little => b'1',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_signal() {
        let mut scan =
            Scanner::new(" IMD_OK : 2|1@1+ (1,0) [0|1] \"\" MASTER,TELEMETRY\n");
        let signal = parse(&mut scan).unwrap();
        assert_eq!(signal.name, "IMD_OK");
        assert_eq!(signal.bit_start, 2);
        assert_eq!(signal.bit_count, 1);
        assert_eq!(signal.byte_order, ByteOrder::Little);
        assert!(!signal.is_signed);
        assert_eq!(signal.receivers, ["MASTER", "TELEMETRY"]);
        assert_eq!(signal.mux, MuxRole::NotMultiplexed);
    }

    #[test]
    fn test_signed_big_endian_with_unit() {
        let mut scan =
            Scanner::new(" STEER_ANGLE : 16|16@0- (0.1,-90) [-90|90] \"deg\" MASTER\n");
        let signal = parse(&mut scan).unwrap();
        assert_eq!(signal.byte_order, ByteOrder::Big);
        assert!(signal.is_signed);
        assert_eq!(signal.scale, 0.1);
        assert_eq!(signal.offset, -90.0);
        assert_eq!(signal.unit, "deg");
    }

    #[test]
    fn test_multiplexer_and_multiplexed() {
        let mut scan = Scanner::new(" TEMPS_MODULE M : 0|8@1+ (1,0) [0|0] \"\" M\n");
        assert_eq!(parse(&mut scan).unwrap().mux, MuxRole::Multiplexer);

        let mut scan = Scanner::new(" TEMP_A m12 : 8|8@1+ (1,0) [0|0] \"\" M\n");
        assert_eq!(parse(&mut scan).unwrap().mux, MuxRole::MultiplexedBy(12));
    }

    #[test]
    fn test_multiplexer_with_selector_is_rejected() {
        // 'M5' declares both roles at once.
        let mut scan = Scanner::new(" BAD M5 : 0|8@1+ (1,0) [0|0] \"\" M\n");
        assert!(parse(&mut scan).is_err());
    }

    #[test]
    fn test_multiplexed_without_selector_is_rejected() {
        let mut scan = Scanner::new(" BAD m : 0|8@1+ (1,0) [0|0] \"\" M\n");
        assert!(parse(&mut scan).is_err());
    }
}
