use std::collections::HashMap;

use crate::types::database::{Database, SignalKey};
use crate::types::object::Attributes;
use crate::types::quark::{self, Quark};
use crate::types::signal::Signal;

/// A CAN message: framing metadata plus its signals in declaration order.
#[derive(Clone, Debug)]
pub struct Message {
    quark: Quark,
    pub id: u32,
    pub name: String,
    /// Declared payload length in bytes.
    pub byte_count: u16,
    /// Sending node name.
    pub sender: String,
    /// Associated comment (DBC `CM_ BO_` section).
    pub description: Option<String>,
    pub attributes: Attributes,
    pub(crate) signals: Vec<SignalKey>,
    pub(crate) sig_key_by_name: HashMap<String, SignalKey>,
    pub(crate) sig_key_by_quark: HashMap<Quark, SignalKey>,
}

impl Message {
    pub(crate) fn new(
        id: u32,
        name: String,
        byte_count: u16,
        sender: String,
        description: Option<String>,
        attributes: Attributes,
    ) -> Self {
        Message {
            quark: quark::next(),
            id,
            name,
            byte_count,
            sender,
            description,
            attributes,
            signals: Vec::new(),
            sig_key_by_name: HashMap::new(),
            sig_key_by_quark: HashMap::new(),
        }
    }

    pub fn quark(&self) -> Quark {
        self.quark
    }

    /// Signal keys in declaration order.
    pub fn signal_keys(&self) -> &[SignalKey] {
        &self.signals
    }

    /// Signals in declaration order.
    pub fn signals<'a>(&'a self, db: &'a Database) -> impl Iterator<Item = &'a Signal> {
        self.signals.iter().filter_map(move |&key| db.signal(key))
    }

    pub fn signal_by_name<'a>(&self, db: &'a Database, name: &str) -> Option<&'a Signal> {
        let key = *self.sig_key_by_name.get(name)?;
        db.signal(key)
    }

    pub fn signal_by_quark<'a>(&self, db: &'a Database, quark: Quark) -> Option<&'a Signal> {
        let key = *self.sig_key_by_quark.get(&quark)?;
        db.signal(key)
    }

    /// Decodes a frame payload into `(signal, physical value)` pairs.
    ///
    /// Multiplexing: the first signal declared with the multiplexer role
    /// selects which `MultiplexedBy` signals are present (a second
    /// multiplexer is reported and ignored). The multiplexer itself is not
    /// part of the output. A payload shorter than the declared byte count
    /// is reported but still decoded; signals whose own bit range does not
    /// fit are skipped individually.
    pub fn decode<'a>(&self, db: &'a Database, bytes: &[u8]) -> Vec<(&'a Signal, f32)> {
        if bytes.len() < self.byte_count as usize {
            log::warn!(
                "frame of {} byte(s) is shorter than the {} byte(s) declared by message '{}'",
                bytes.len(),
                self.byte_count,
                self.name
            );
        }

        let mut multiplexer: Option<SignalKey> = None;
        for &key in &self.signals {
            let Some(signal) = db.signal(key) else {
                continue;
            };
            if !signal.is_multiplexer() {
                continue;
            }
            if multiplexer.is_some() {
                log::error!("multiple multiplexers in message '{}'", self.name);
                continue;
            }
            multiplexer = Some(key);
        }

        let selector: Option<u64> = multiplexer
            .and_then(|key| db.signal(key))
            .map(|signal| match signal.extract_raw(bytes) {
                Ok(raw) => raw,
                Err(err) => {
                    log::warn!(
                        "cannot extract multiplexer '{}' of message '{}': {}",
                        signal.name,
                        self.name,
                        err
                    );
                    0
                }
            });

        let mut values = Vec::new();
        for &key in &self.signals {
            if Some(key) == multiplexer {
                continue;
            }
            let Some(signal) = db.signal(key) else {
                continue;
            };

            if let (Some(selector), Some(multiplexed)) = (selector, signal.multiplexed_value()) {
                if u64::from(multiplexed) != selector {
                    continue;
                }
            }

            match signal.decode(bytes) {
                Ok(value) => values.push((signal, value)),
                Err(err) => {
                    log::warn!(
                        "skipping signal '{}' of message '{}': {}",
                        signal.name,
                        self.name,
                        err
                    );
                }
            }
        }

        values
    }
}
