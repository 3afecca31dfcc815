//! Raw database accumulator.
//!
//! Every successfully parsed construct is folded into a [`RawDatabase`].
//! Each `add_*` is first-write-wins: re-adding an already-present unique key
//! aborts the load instead of overwriting. The one exception is attribute
//! assignments, whose duplicates are silently ignored (matching the
//! reference implementation; they are not in the fatal-duplicate set).
//!
//! The accumulator also answers the resolution queries the model builder
//! needs: typed attribute maps per owner and value tables per signal.

use std::collections::BTreeMap;

use crate::dbc::types::attributes::{
    AttrObject, AttributeData, AttributeDefault, AttributeDefinition,
};
use crate::types::errors::LoadError;
use crate::types::signal::{ByteOrder, MuxRole};

/// A parsed `SG_` line, before model build.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSignal {
    pub name: String,
    pub bit_start: u16,
    pub bit_count: u16,
    pub byte_order: ByteOrder,
    pub is_signed: bool,
    pub scale: f32,
    pub offset: f32,
    pub min: f32,
    pub max: f32,
    pub unit: String,
    pub receivers: Vec<String>,
    pub mux: MuxRole,
}

/// A parsed `BO_` block (header plus its nested `SG_` lines).
#[derive(Clone, Debug, PartialEq)]
pub struct RawMessage {
    pub id: u32,
    pub name: String,
    pub byte_count: u16,
    pub sender: String,
    pub signals: Vec<RawSignal>,
}

/// A parsed `CM_` line, one variant per owning object.
#[derive(Clone, Debug, PartialEq)]
pub enum Description {
    Database(String),
    Node { node: String, text: String },
    Message { message: u32, text: String },
    Signal { message: u32, signal: String, text: String },
}

/// A parsed `BA_` line, one variant per owning object.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeAssignment {
    Database { name: String, text: String },
    Node { name: String, node: String, text: String },
    Message { name: String, message: u32, text: String },
    Signal { name: String, message: u32, signal: String, text: String },
}

/// Where a `VAL_` line takes its entries from.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueSource {
    /// Inline `<raw> "<label>"` pairs.
    Inline(Vec<(u64, String)>),
    /// Reference to a named `VAL_TABLE_`.
    Table(String),
}

/// Owner reference used by the attribute/description resolution queries.
#[derive(Clone, Copy, Debug)]
pub enum AttrOwner<'a> {
    Database,
    Node(&'a str),
    Message(u32),
    Signal(u32, &'a str),
}

impl AttrOwner<'_> {
    fn object(&self) -> AttrObject {
        match self {
            AttrOwner::Database => AttrObject::Database,
            AttrOwner::Node(_) => AttrObject::Node,
            AttrOwner::Message(_) => AttrObject::Message,
            AttrOwner::Signal(..) => AttrObject::Signal,
        }
    }

    fn describe(&self) -> String {
        match self {
            AttrOwner::Database => "the database".to_string(),
            AttrOwner::Node(node) => format!("node '{node}'"),
            AttrOwner::Message(message) => format!("message {message}"),
            AttrOwner::Signal(message, signal) => {
                format!("signal '{signal}' of message {message}")
            }
        }
    }
}

/// Accumulated parse result of one `.dbc` document.
///
/// Built incrementally while parsing, immutable afterwards.
#[derive(Clone, Debug, Default)]
pub struct RawDatabase {
    version: Option<String>,
    requirements: Option<Vec<String>>,
    speed: Option<Option<u32>>,
    nodes: Option<Vec<String>>,

    messages: BTreeMap<u32, RawMessage>,
    message_names: BTreeMap<String, u32>,

    database_description: Option<String>,
    node_descriptions: BTreeMap<String, String>,
    message_descriptions: BTreeMap<u32, String>,
    signal_descriptions: BTreeMap<(u32, String), String>,

    attribute_definitions: BTreeMap<String, AttributeDefinition>,
    attribute_defaults: BTreeMap<String, AttributeDefault>,

    database_attributes: BTreeMap<String, String>,
    node_attributes: BTreeMap<(String, String), String>,
    message_attributes: BTreeMap<(u32, String), String>,
    signal_attributes: BTreeMap<(u32, String, String), String>,

    value_definitions: BTreeMap<(u32, String), ValueSource>,
    value_tables: BTreeMap<String, Vec<(u64, String)>>,
}

impl RawDatabase {
    pub fn add_version(&mut self, version: String) -> Result<(), LoadError> {
        if self.version.is_some() {
            return Err(LoadError::DuplicateVersion);
        }
        self.version = Some(version);
        Ok(())
    }

    pub fn add_requirements(&mut self, requirements: Vec<String>) -> Result<(), LoadError> {
        if self.requirements.is_some() {
            return Err(LoadError::DuplicateRequirements);
        }
        self.requirements = Some(requirements);
        Ok(())
    }

    pub fn add_speed(&mut self, speed: Option<u32>) -> Result<(), LoadError> {
        if self.speed.is_some() {
            return Err(LoadError::DuplicateSpeed);
        }
        self.speed = Some(speed);
        Ok(())
    }

    pub fn add_nodes(&mut self, nodes: Vec<String>) -> Result<(), LoadError> {
        if self.nodes.is_some() {
            return Err(LoadError::DuplicateNodes);
        }
        self.nodes = Some(nodes);
        Ok(())
    }

    /// Adds a message, enforcing id uniqueness, name uniqueness and signal
    /// name uniqueness within the message.
    pub fn add_message(&mut self, message: RawMessage) -> Result<(), LoadError> {
        if self.messages.contains_key(&message.id) {
            return Err(LoadError::DuplicateMessageId { id: message.id });
        }
        if self.message_names.contains_key(&message.name) {
            return Err(LoadError::DuplicateMessageName {
                name: message.name.clone(),
            });
        }
        for (i, signal) in message.signals.iter().enumerate() {
            if message.signals[..i].iter().any(|s| s.name == signal.name) {
                return Err(LoadError::DuplicateSignal {
                    message: message.id,
                    signal: signal.name.clone(),
                });
            }
        }

        self.message_names.insert(message.name.clone(), message.id);
        self.messages.insert(message.id, message);
        Ok(())
    }

    pub fn add_description(&mut self, description: Description) -> Result<(), LoadError> {
        match description {
            Description::Database(text) => {
                if self.database_description.is_some() {
                    return Err(LoadError::DuplicateDescription {
                        owner: "the database".to_string(),
                    });
                }
                self.database_description = Some(text);
            }
            Description::Node { node, text } => {
                if self.node_descriptions.contains_key(&node) {
                    return Err(LoadError::DuplicateDescription {
                        owner: format!("node '{node}'"),
                    });
                }
                self.node_descriptions.insert(node, text);
            }
            Description::Message { message, text } => {
                if self.message_descriptions.contains_key(&message) {
                    return Err(LoadError::DuplicateDescription {
                        owner: format!("message {message}"),
                    });
                }
                self.message_descriptions.insert(message, text);
            }
            Description::Signal {
                message,
                signal,
                text,
            } => {
                let key = (message, signal);
                if self.signal_descriptions.contains_key(&key) {
                    return Err(LoadError::DuplicateDescription {
                        owner: format!("signal '{}' of message {}", key.1, key.0),
                    });
                }
                self.signal_descriptions.insert(key, text);
            }
        }
        Ok(())
    }

    pub fn add_attribute_definition(
        &mut self,
        definition: AttributeDefinition,
    ) -> Result<(), LoadError> {
        if self.attribute_definitions.contains_key(&definition.name) {
            return Err(LoadError::DuplicateAttributeDefinition {
                name: definition.name.clone(),
            });
        }
        self.attribute_definitions
            .insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn add_attribute_default(&mut self, default: AttributeDefault) -> Result<(), LoadError> {
        if self.attribute_defaults.contains_key(&default.name) {
            return Err(LoadError::DuplicateAttributeDefault {
                name: default.name.clone(),
            });
        }
        self.attribute_defaults.insert(default.name.clone(), default);
        Ok(())
    }

    /// Records an assignment without validating it; validation is deferred
    /// to resolution. A duplicate assignment is ignored, not fatal.
    pub fn add_attribute(&mut self, assignment: AttributeAssignment) {
        match assignment {
            AttributeAssignment::Database { name, text } => {
                self.database_attributes.entry(name).or_insert(text);
            }
            AttributeAssignment::Node { name, node, text } => {
                self.node_attributes.entry((node, name)).or_insert(text);
            }
            AttributeAssignment::Message {
                name,
                message,
                text,
            } => {
                self.message_attributes
                    .entry((message, name))
                    .or_insert(text);
            }
            AttributeAssignment::Signal {
                name,
                message,
                signal,
                text,
            } => {
                self.signal_attributes
                    .entry((message, signal, name))
                    .or_insert(text);
            }
        }
    }

    pub fn add_value_table(
        &mut self,
        name: String,
        entries: Vec<(u64, String)>,
    ) -> Result<(), LoadError> {
        if self.value_tables.contains_key(&name) {
            return Err(LoadError::DuplicateValueTable { name });
        }
        self.value_tables.insert(name, entries);
        Ok(())
    }

    pub fn add_value_definitions(
        &mut self,
        message: u32,
        signal: String,
        source: ValueSource,
    ) -> Result<(), LoadError> {
        let key = (message, signal);
        if self.value_definitions.contains_key(&key) {
            return Err(LoadError::DuplicateValueDefinitions {
                message: key.0,
                signal: key.1,
            });
        }
        self.value_definitions.insert(key, source);
        Ok(())
    }

    // --- queries ---

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn requirements(&self) -> Option<&[String]> {
        self.requirements.as_deref()
    }

    /// `None` if no `BS_` line was present; `Some(None)` if it carried no
    /// number.
    pub fn speed(&self) -> Option<Option<u32>> {
        self.speed
    }

    pub fn node_names(&self) -> Option<&[String]> {
        self.nodes.as_deref()
    }

    pub fn messages(&self) -> impl Iterator<Item = &RawMessage> {
        self.messages.values()
    }

    pub fn attribute_definition(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attribute_definitions.get(name)
    }

    pub fn attribute_default(&self, name: &str) -> Option<&AttributeDefault> {
        self.attribute_defaults.get(name)
    }

    pub fn description(&self, owner: AttrOwner) -> Option<&str> {
        match owner {
            AttrOwner::Database => self.database_description.as_deref(),
            AttrOwner::Node(node) => self.node_descriptions.get(node).map(String::as_str),
            AttrOwner::Message(message) => {
                self.message_descriptions.get(&message).map(String::as_str)
            }
            AttrOwner::Signal(message, signal) => self
                .signal_descriptions
                .get(&(message, signal.to_string()))
                .map(String::as_str),
        }
    }

    /// Raw `(name, text)` assignments recorded for one owner.
    fn assignments(&self, owner: AttrOwner) -> Vec<(&str, &str)> {
        match owner {
            AttrOwner::Database => self
                .database_attributes
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str()))
                .collect(),
            AttrOwner::Node(node) => self
                .node_attributes
                .iter()
                .filter(|(key, _)| key.0 == node)
                .map(|(key, text)| (key.1.as_str(), text.as_str()))
                .collect(),
            AttrOwner::Message(message) => self
                .message_attributes
                .iter()
                .filter(|(key, _)| key.0 == message)
                .map(|(key, text)| (key.1.as_str(), text.as_str()))
                .collect(),
            AttrOwner::Signal(message, signal) => self
                .signal_attributes
                .iter()
                .filter(|(key, _)| key.0 == message && key.1 == signal)
                .map(|(key, text)| (key.2.as_str(), text.as_str()))
                .collect(),
        }
    }

    /// Looks up the definition for an assignment.
    ///
    /// Missing definition is fatal. A definition scoped to a different
    /// object kind yields `None`: the assignment belongs to a same-named
    /// attribute of another object class and is skipped silently.
    fn matching_definition(
        &self,
        owner: AttrOwner,
        name: &str,
    ) -> Result<Option<&AttributeDefinition>, LoadError> {
        let definition =
            self.attribute_definition(name)
                .ok_or_else(|| LoadError::UndefinedAttribute {
                    name: name.to_string(),
                    owner: owner.describe(),
                })?;

        if definition.object != owner.object() {
            return Ok(None);
        }

        Ok(Some(definition))
    }

    /// Resolves the integer-typed attributes of one owner.
    pub fn integer_attributes(&self, owner: AttrOwner) -> Result<BTreeMap<String, i64>, LoadError> {
        let mut attributes = BTreeMap::new();
        for (name, text) in self.assignments(owner) {
            let Some(definition) = self.matching_definition(owner, name)? else {
                continue;
            };
            if let AttributeData::Integer { min, max } = definition.data {
                let value = definition.parse_integer(min, max, text)?;
                attributes.insert(name.to_string(), value);
            }
        }
        Ok(attributes)
    }

    /// Resolves the float-typed attributes of one owner.
    pub fn float_attributes(&self, owner: AttrOwner) -> Result<BTreeMap<String, f32>, LoadError> {
        let mut attributes = BTreeMap::new();
        for (name, text) in self.assignments(owner) {
            let Some(definition) = self.matching_definition(owner, name)? else {
                continue;
            };
            if let AttributeData::Float { min, max } = definition.data {
                let value = definition.parse_float(min, max, text)?;
                attributes.insert(name.to_string(), value);
            }
        }
        Ok(attributes)
    }

    /// Resolves the string- and enum-typed attributes of one owner.
    pub fn string_attributes(
        &self,
        owner: AttrOwner,
    ) -> Result<BTreeMap<String, String>, LoadError> {
        let mut attributes = BTreeMap::new();
        for (name, text) in self.assignments(owner) {
            let Some(definition) = self.matching_definition(owner, name)? else {
                continue;
            };
            match &definition.data {
                AttributeData::String => {
                    attributes.insert(name.to_string(), text.to_string());
                }
                AttributeData::Enum { values } => {
                    let value = definition.parse_enum(values, text)?;
                    attributes.insert(name.to_string(), value);
                }
                _ => {}
            }
        }
        Ok(attributes)
    }

    /// Value table of one signal.
    ///
    /// Empty when no `VAL_` entry exists or when a named reference dangles;
    /// a missing table only means labels are unavailable, never an error.
    pub fn signal_values(&self, message: u32, signal: &str) -> BTreeMap<u64, String> {
        let Some(source) = self.value_definitions.get(&(message, signal.to_string())) else {
            return BTreeMap::new();
        };

        let entries = match source {
            ValueSource::Inline(entries) => entries,
            ValueSource::Table(name) => match self.value_tables.get(name) {
                Some(entries) => entries,
                None => return BTreeMap::new(),
            },
        };

        entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_message(id: u32, name: &str) -> RawMessage {
        RawMessage {
            id,
            name: name.to_string(),
            byte_count: 8,
            sender: "MASTER".to_string(),
            signals: Vec::new(),
        }
    }

    #[test]
    fn test_duplicate_message_id_rejected() {
        let mut raw = RawDatabase::default();
        raw.add_message(raw_message(64, "EXTRM_TEMPS")).unwrap();
        assert!(matches!(
            raw.add_message(raw_message(64, "OTHER")),
            Err(LoadError::DuplicateMessageId { id: 64 })
        ));
    }

    #[test]
    fn test_duplicate_message_name_rejected() {
        let mut raw = RawDatabase::default();
        raw.add_message(raw_message(64, "EXTRM_TEMPS")).unwrap();
        assert!(matches!(
            raw.add_message(raw_message(65, "EXTRM_TEMPS")),
            Err(LoadError::DuplicateMessageName { .. })
        ));
    }

    #[test]
    fn test_duplicate_attribute_definition_rejected() {
        let mut raw = RawDatabase::default();
        let def = AttributeDefinition {
            name: "BusType".to_string(),
            object: AttrObject::Database,
            data: AttributeData::String,
        };
        raw.add_attribute_definition(def.clone()).unwrap();
        assert!(matches!(
            raw.add_attribute_definition(def),
            Err(LoadError::DuplicateAttributeDefinition { .. })
        ));
    }

    #[test]
    fn test_duplicate_assignment_is_ignored() {
        let mut raw = RawDatabase::default();
        raw.add_attribute_definition(AttributeDefinition {
            name: "BusType".to_string(),
            object: AttrObject::Database,
            data: AttributeData::String,
        })
        .unwrap();
        raw.add_attribute(AttributeAssignment::Database {
            name: "BusType".to_string(),
            text: "CAN".to_string(),
        });
        raw.add_attribute(AttributeAssignment::Database {
            name: "BusType".to_string(),
            text: "CAN FD".to_string(),
        });

        let strings = raw.string_attributes(AttrOwner::Database).unwrap();
        assert_eq!(strings.get("BusType").map(String::as_str), Some("CAN"));
    }

    #[test]
    fn test_missing_definition_is_fatal() {
        let mut raw = RawDatabase::default();
        raw.add_attribute(AttributeAssignment::Message {
            name: "GenMsgCycleTime".to_string(),
            message: 64,
            text: "500".to_string(),
        });
        assert!(matches!(
            raw.integer_attributes(AttrOwner::Message(64)),
            Err(LoadError::UndefinedAttribute { .. })
        ));
    }

    #[test]
    fn test_mismatched_owner_kind_is_skipped() {
        let mut raw = RawDatabase::default();
        raw.add_attribute_definition(AttributeDefinition {
            name: "CycleTime".to_string(),
            object: AttrObject::Signal,
            data: AttributeData::Integer { min: 0, max: 0 },
        })
        .unwrap();
        raw.add_attribute(AttributeAssignment::Message {
            name: "CycleTime".to_string(),
            message: 64,
            text: "500".to_string(),
        });

        // Defined for signals, assigned on a message: skipped, not fatal.
        let integers = raw.integer_attributes(AttrOwner::Message(64)).unwrap();
        assert!(integers.is_empty());
    }

    #[test]
    fn test_dangling_value_table_reference_is_empty() {
        let mut raw = RawDatabase::default();
        raw.add_value_definitions(
            768,
            "TEMPS_MODULE".to_string(),
            ValueSource::Table("MODULE_NAMES".to_string()),
        )
        .unwrap();
        assert!(raw.signal_values(768, "TEMPS_MODULE").is_empty());
    }

    #[test]
    fn test_inline_and_named_value_tables() {
        let mut raw = RawDatabase::default();
        raw.add_value_table(
            "MODULE_NAMES".to_string(),
            vec![(0, "MODULE_1".to_string()), (1, "MODULE_2".to_string())],
        )
        .unwrap();
        raw.add_value_definitions(
            768,
            "TEMPS_MODULE".to_string(),
            ValueSource::Table("MODULE_NAMES".to_string()),
        )
        .unwrap();
        raw.add_value_definitions(
            768,
            "TEMPS_CHANNEL".to_string(),
            ValueSource::Inline(vec![(0, "CHANNEL_1".to_string())]),
        )
        .unwrap();

        let named = raw.signal_values(768, "TEMPS_MODULE");
        assert_eq!(named.get(&1).map(String::as_str), Some("MODULE_2"));
        let inline = raw.signal_values(768, "TEMPS_CHANNEL");
        assert_eq!(inline.get(&0).map(String::as_str), Some("CHANNEL_1"));
        assert!(raw.signal_values(768, "NO_SUCH_SIGNAL").is_empty());
    }

    #[test]
    fn test_singletons_are_first_write_wins() {
        let mut raw = RawDatabase::default();
        raw.add_version("1.0".to_string()).unwrap();
        assert!(matches!(
            raw.add_version("2.0".to_string()),
            Err(LoadError::DuplicateVersion)
        ));
        raw.add_speed(Some(500000)).unwrap();
        assert!(matches!(
            raw.add_speed(None),
            Err(LoadError::DuplicateSpeed)
        ));
    }
}
