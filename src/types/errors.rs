use std::io;
use thiserror::Error;

use crate::dbc::types::attributes::AttrObject;

/// Syntax error inside a `.dbc` construct.
///
/// Positions are 1-based. Once the document loop has committed to a keyword,
/// any syntax error inside that construct is terminal for the whole load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{line}:{column}: expected {expected}")]
    Expected {
        line: usize,
        column: usize,
        expected: &'static str,
    },
    #[error("{line}:{column}: unknown keyword '{keyword}'")]
    UnknownKeyword {
        line: usize,
        column: usize,
        keyword: String,
    },
    #[error("{line}:{column}: number out of range")]
    NumberOutOfRange { line: usize, column: usize },
}

/// Errors produced while loading a `.dbc` file into a [`Database`](crate::Database).
///
/// A database loads atomically: any of these aborts the whole load and no
/// partial database is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Version declared twice")]
    DuplicateVersion,
    #[error("Requirements (NS_) declared twice")]
    DuplicateRequirements,
    #[error("Bus speed (BS_) declared twice")]
    DuplicateSpeed,
    #[error("Node list (BU_) declared twice")]
    DuplicateNodes,
    #[error("Message id {id} already assigned to an existing message")]
    DuplicateMessageId { id: u32 },
    #[error("Message '{name}' already exists")]
    DuplicateMessageName { name: String },
    #[error("Signal '{signal}' already exists in message {message}")]
    DuplicateSignal { message: u32, signal: String },
    #[error("Attribute '{name}' already defined")]
    DuplicateAttributeDefinition { name: String },
    #[error("Default for attribute '{name}' already defined")]
    DuplicateAttributeDefault { name: String },
    #[error("Value table '{name}' already defined")]
    DuplicateValueTable { name: String },
    #[error("Value definitions for signal '{signal}' of message {message} already exist")]
    DuplicateValueDefinitions { message: u32, signal: String },
    #[error("Description for {owner} already exists")]
    DuplicateDescription { owner: String },
    #[error("No attribute definition for '{name}' (assigned on {owner})")]
    UndefinedAttribute { name: String, owner: String },
    #[error("Failed to parse integer attribute '{name}' from '{text}'")]
    InvalidIntegerAttribute { name: String, text: String },
    #[error("Failed to parse float attribute '{name}' from '{text}'")]
    InvalidFloatAttribute { name: String, text: String },
    #[error("Value '{text}' of enum attribute '{name}' is not one of its allowed values")]
    InvalidEnumAttribute { name: String, text: String },
    #[error("Value '{text}' of attribute '{name}' ({object}) is out of range")]
    AttributeOutOfRange {
        name: String,
        object: AttrObject,
        text: String,
    },
}

/// Errors produced while extracting a signal's raw bits from a frame payload.
///
/// Decode failures are local: the caller skips the affected signal and keeps
/// processing the rest of the frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Frame of {available} byte(s) is too small to decode the signal ({needed} needed)")]
    FrameTooShort { needed: usize, available: usize },
}
