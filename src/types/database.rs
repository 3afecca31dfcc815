use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::dbc::types::ast::{AttrOwner, RawDatabase};
use crate::types::errors::LoadError;
use crate::types::message::Message;
use crate::types::node::Node;
use crate::types::object::Attributes;
use crate::types::quark::Quark;
use crate::types::signal::Signal;

new_key_type! {
    /// Stable arena key of a [`Node`].
    pub struct NodeKey;
    /// Stable arena key of a [`Message`].
    pub struct MessageKey;
    /// Stable arena key of a [`Signal`].
    pub struct SignalKey;
}

/// A fully resolved CAN database.
///
/// Built atomically from the raw parse result: descriptions, value tables and
/// attributes are resolved onto their owners up front, so lookups and frame
/// decoding never touch the raw accumulator again.
#[derive(Clone, Debug, Default)]
pub struct Database {
    pub version: Option<String>,
    /// `NS_` entries, in file order.
    pub requirements: Vec<String>,
    /// Bus speed from `BS_`, if one was given.
    pub speed: Option<u32>,
    /// Associated comment (DBC `CM_` database section).
    pub description: Option<String>,
    pub attributes: Attributes,

    nodes: SlotMap<NodeKey, Node>,
    messages: SlotMap<MessageKey, Message>,
    signals: SlotMap<SignalKey, Signal>,

    nodes_order: Vec<NodeKey>,
    messages_order: Vec<MessageKey>,

    node_key_by_name: HashMap<String, NodeKey>,
    msg_key_by_id: HashMap<u32, MessageKey>,
    msg_key_by_name: HashMap<String, MessageKey>,
    msg_key_by_quark: HashMap<Quark, MessageKey>,
}

impl Database {
    /// Resolves a [`RawDatabase`] into the final model.
    ///
    /// Attribute texts are interpreted against their definitions here, so any
    /// invalid assignment aborts the build.
    pub(crate) fn from_raw(raw: &RawDatabase) -> Result<Database, LoadError> {
        let mut db = Database {
            version: raw.version().map(str::to_string),
            requirements: raw.requirements().unwrap_or_default().to_vec(),
            speed: raw.speed().flatten(),
            description: raw.description(AttrOwner::Database).map(str::to_string),
            attributes: resolve_attributes(raw, AttrOwner::Database)?,
            ..Database::default()
        };

        for name in raw.node_names().unwrap_or_default() {
            let owner = AttrOwner::Node(name);
            let node = Node {
                name: name.clone(),
                description: raw.description(owner).map(str::to_string),
                attributes: resolve_attributes(raw, owner)?,
            };
            let key = db.nodes.insert(node);
            db.nodes_order.push(key);
            db.node_key_by_name.insert(name.clone(), key);
        }

        for raw_message in raw.messages() {
            let owner = AttrOwner::Message(raw_message.id);
            let mut message = Message::new(
                raw_message.id,
                raw_message.name.clone(),
                raw_message.byte_count,
                raw_message.sender.clone(),
                raw.description(owner).map(str::to_string),
                resolve_attributes(raw, owner)?,
            );

            for raw_signal in &raw_message.signals {
                let owner = AttrOwner::Signal(raw_message.id, &raw_signal.name);
                let signal = Signal::new(
                    raw_signal,
                    raw.signal_values(raw_message.id, &raw_signal.name),
                    raw.description(owner).map(str::to_string),
                    resolve_attributes(raw, owner)?,
                );
                let sig_quark = signal.quark();
                let sig_key = db.signals.insert(signal);
                message.signals.push(sig_key);
                message
                    .sig_key_by_name
                    .insert(raw_signal.name.clone(), sig_key);
                message.sig_key_by_quark.insert(sig_quark, sig_key);
            }

            let id = message.id;
            let name = message.name.clone();
            let msg_quark = message.quark();
            let msg_key = db.messages.insert(message);
            db.msg_key_by_id.insert(id, msg_key);
            db.msg_key_by_name.insert(name, msg_key);
            db.msg_key_by_quark.insert(msg_quark, msg_key);
            db.messages_order.push(msg_key);
        }

        Ok(db)
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        let key = *self.node_key_by_name.get(name)?;
        self.nodes.get(key)
    }

    /// Nodes in `BU_` declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_order
            .iter()
            .filter_map(move |&key| self.nodes.get(key))
    }

    pub fn message(&self, key: MessageKey) -> Option<&Message> {
        self.messages.get(key)
    }

    pub fn message_by_id(&self, id: u32) -> Option<&Message> {
        let key = *self.msg_key_by_id.get(&id)?;
        self.messages.get(key)
    }

    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        let key = *self.msg_key_by_name.get(name)?;
        self.messages.get(key)
    }

    pub fn message_by_quark(&self, quark: Quark) -> Option<&Message> {
        let key = *self.msg_key_by_quark.get(&quark)?;
        self.messages.get(key)
    }

    /// Messages in ascending id order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages_order
            .iter()
            .filter_map(move |&key| self.messages.get(key))
    }

    pub fn signal(&self, key: SignalKey) -> Option<&Signal> {
        self.signals.get(key)
    }

    /// Decodes a frame payload against the message with the given id.
    ///
    /// An id this database does not know yields an empty vector, never an
    /// error: foreign frames on a shared bus are routine.
    pub fn decode(&self, id: u32, bytes: &[u8]) -> Vec<(&Signal, f32)> {
        match self.message_by_id(id) {
            Some(message) => message.decode(self, bytes),
            None => Vec::new(),
        }
    }
}

fn resolve_attributes(raw: &RawDatabase, owner: AttrOwner) -> Result<Attributes, LoadError> {
    Ok(Attributes {
        integers: raw.integer_attributes(owner)?,
        floats: raw.float_attributes(owner)?,
        strings: raw.string_attributes(owner)?,
    })
}
