use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dbc::types::ast::RawSignal;
use crate::types::errors::DecodeError;
use crate::types::object::Attributes;
use crate::types::quark::{self, Quark};

/// Byte order of a signal's bit layout.
///
/// `Little` is Intel encoding (`@1` in the DBC text), `Big` is Motorola
/// (`@0`). The order is recorded as metadata but extraction currently only
/// unpacks the little-endian layout, see [`Signal::extract_raw`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// Multiplexing role of a signal within its message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MuxRole {
    /// Present in every frame of the message.
    #[default]
    NotMultiplexed,
    /// This signal's decoded value selects which multiplexed group is valid.
    Multiplexer,
    /// Present only when the message's multiplexer decodes to this selector.
    MultiplexedBy(u16),
}

const INTEGRAL_EPSILON: f32 = 0.000_000_01;

/// A named, scaled field packed into a fixed bit range of a message payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    quark: Quark,
    pub name: String,
    /// Start bit in the payload (bit 0 = LSB of the first byte).
    pub bit_start: u16,
    pub bit_count: u16,
    pub byte_order: ByteOrder,
    /// Recorded from the DBC text; extraction does not sign-extend.
    pub is_signed: bool,
    pub scale: f32,
    pub offset: f32,
    pub min: f32,
    pub max: f32,
    pub unit: String,
    /// Receiver node names.
    pub receivers: Vec<String>,
    pub mux: MuxRole,
    /// Raw value to label mapping, empty if the signal has no value table.
    pub values: BTreeMap<u64, String>,
    /// Associated comment (DBC `CM_ SG_` section).
    pub description: Option<String>,
    pub attributes: Attributes,
    is_integral: bool,
}

/// Result of [`Signal::decode_and_resolve`]: the value-table label when one
/// matches the raw value, the physical value otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded<'a> {
    Physical(f32),
    Label(&'a str),
}

impl Signal {
    pub(crate) fn new(
        raw: &RawSignal,
        values: BTreeMap<u64, String>,
        description: Option<String>,
        attributes: Attributes,
    ) -> Self {
        let is_integral = (raw.scale - 1.0).abs() < INTEGRAL_EPSILON
            && raw.offset.abs() < INTEGRAL_EPSILON;

        Signal {
            quark: quark::next(),
            name: raw.name.clone(),
            bit_start: raw.bit_start,
            bit_count: raw.bit_count,
            byte_order: raw.byte_order,
            is_signed: raw.is_signed,
            scale: raw.scale,
            offset: raw.offset,
            min: raw.min,
            max: raw.max,
            unit: raw.unit.clone(),
            receivers: raw.receivers.clone(),
            mux: raw.mux,
            values,
            description,
            attributes,
            is_integral,
        }
    }

    /// Process-unique identity token, assigned at model build.
    pub fn quark(&self) -> Quark {
        self.quark
    }

    /// True iff scale is ~1 and offset is ~0, so raw and physical coincide.
    pub fn is_integral(&self) -> bool {
        self.is_integral
    }

    pub fn is_multiplexer(&self) -> bool {
        self.mux == MuxRole::Multiplexer
    }

    pub fn multiplexed_value(&self) -> Option<u16> {
        match self.mux {
            MuxRole::MultiplexedBy(selector) => Some(selector),
            _ => None,
        }
    }

    /// Extracts the unsigned raw value of this signal from a frame payload.
    ///
    /// Bits accumulate LSB-first (Intel layout); big-endian signals go
    /// through the same path, which is a known limitation kept for
    /// compatibility with existing databases. The length check requires one
    /// byte past the end bit even when the signal ends exactly on a byte
    /// boundary, also kept as-is.
    pub fn extract_raw(&self, bytes: &[u8]) -> Result<u64, DecodeError> {
        let start_bit = self.bit_start as usize;
        let bit_count = self.bit_count as usize;
        let end_bit = start_bit + bit_count;

        let byte_start = start_bit / 8;
        let byte_end = end_bit / 8;

        if byte_end >= bytes.len() {
            return Err(DecodeError::FrameTooShort {
                needed: byte_end + 1,
                available: bytes.len(),
            });
        }

        // bit_packed may go negative for a signal contained in a single
        // byte; it is only read when further bytes follow, where it is
        // positive again.
        let mut bit_packed = 0i64;
        let mut value = 0u64;
        for i in byte_start..=byte_end {
            if i == byte_start {
                value |= (bytes[i] >> (start_bit - 8 * byte_start)) as u64;
                bit_packed += 8 * byte_end as i64 - start_bit as i64;
            } else {
                value |= (bytes[i] as u64) << bit_packed as u32;
                bit_packed += 8;
            }
        }

        Ok(value & mask(bit_count))
    }

    /// Converts a raw value into the physical value.
    ///
    /// The raw bit pattern is treated as unsigned even for signed signals
    /// (no sign extension happens anywhere in the decode path).
    pub fn to_physical(&self, raw: u64) -> f32 {
        raw as f32 * self.scale + self.offset
    }

    /// Looks up the label for a raw value in the signal's value table.
    pub fn resolve_value(&self, raw: u64) -> Option<&str> {
        self.values.get(&raw).map(String::as_str)
    }

    /// Extracts and converts in one step.
    pub fn decode(&self, bytes: &[u8]) -> Result<f32, DecodeError> {
        let raw = self.extract_raw(bytes)?;
        Ok(self.to_physical(raw))
    }

    /// Like [`decode`](Signal::decode), but returns the value-table label
    /// when one exists for the raw value.
    pub fn decode_and_resolve(&self, bytes: &[u8]) -> Result<Decoded<'_>, DecodeError> {
        let raw = self.extract_raw(bytes)?;
        if let Some(label) = self.resolve_value(raw) {
            return Ok(Decoded::Label(label));
        }
        Ok(Decoded::Physical(self.to_physical(raw)))
    }
}

fn mask(bit_count: usize) -> u64 {
    if bit_count >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_count) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn signal(bit_start: u16, bit_count: u16, scale: f32, offset: f32) -> Signal {
        Signal::new(
            &RawSignal {
                name: "TEST".to_string(),
                bit_start,
                bit_count,
                byte_order: ByteOrder::Little,
                is_signed: false,
                scale,
                offset,
                min: 0.0,
                max: 0.0,
                unit: String::new(),
                receivers: Vec::new(),
                mux: MuxRole::NotMultiplexed,
            },
            BTreeMap::new(),
            None,
            Attributes::default(),
        )
    }

    #[test]
    fn test_extract_raw_14_bits_from_start() {
        let sig = signal(0, 14, 1.0, 0.0);
        let raw = sig.extract_raw(&[0x34, 0x12]).unwrap();
        assert_eq!(raw, 0x1234 & 0x3FFF);
    }

    #[test]
    fn test_extract_raw_second_field() {
        // 14 bits starting at bit 8: the full second byte plus six bits of
        // the third.
        let sig = signal(8, 14, 1.0, 0.0);
        let raw = sig.extract_raw(&[0xFF, 0x34, 0x12]).unwrap();
        assert_eq!(raw, 0x1234 & 0x3FFF);
    }

    #[test]
    fn test_extract_raw_frame_too_short() {
        let sig = signal(0, 14, 1.0, 0.0);
        assert_eq!(
            sig.extract_raw(&[0x34]),
            Err(DecodeError::FrameTooShort {
                needed: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_extract_raw_needs_byte_past_aligned_end() {
        // A signal ending exactly on a byte boundary still requires the next
        // byte to be present; kept from the reference implementation.
        let sig = signal(0, 8, 1.0, 0.0);
        assert!(sig.extract_raw(&[0xAB]).is_err());
        assert_eq!(sig.extract_raw(&[0xAB, 0x00]).unwrap(), 0xAB);
    }

    #[test]
    fn test_extract_raw_single_bit_flag() {
        let sig = signal(2, 1, 1.0, 0.0);
        assert_eq!(sig.extract_raw(&[0b0000_0100]).unwrap(), 1);
        assert_eq!(sig.extract_raw(&[0b0000_0010]).unwrap(), 0);
    }

    #[test]
    fn test_to_physical_scaling() {
        let sig = signal(0, 14, 0.0054931640625, 0.0);
        assert_relative_eq!(sig.to_physical(16384), 90.0, max_relative = 1e-5);
    }

    #[test]
    fn test_no_sign_extension_for_signed_signals() {
        let mut sig = signal(0, 8, 1.0, 0.0);
        sig.is_signed = true;
        // 0xFF stays 255, not -1.
        assert_eq!(sig.decode(&[0xFF, 0x00]).unwrap(), 255.0);
    }

    #[test]
    fn test_is_integral_derived_from_scale_and_offset() {
        assert!(signal(0, 8, 1.0, 0.0).is_integral());
        assert!(!signal(0, 8, 0.5, 0.0).is_integral());
        assert!(!signal(0, 8, 1.0, 10.0).is_integral());
    }

    #[test]
    fn test_decode_and_resolve_prefers_label() {
        let mut sig = signal(0, 8, 1.0, 0.0);
        sig.values.insert(1, "On".to_string());
        assert_eq!(
            sig.decode_and_resolve(&[0x01, 0x00]).unwrap(),
            Decoded::Label("On")
        );
        assert_eq!(
            sig.decode_and_resolve(&[0x02, 0x00]).unwrap(),
            Decoded::Physical(2.0)
        );
    }
}
