//! # can_db
//!
//! Parsing and decoding of **CAN databases** in the DBC text format.
//!
//! ## Highlights
//! - **DBC parser**: load `.dbc` files into a SlotMap-backed [`Database`];
//!   loading is atomic and any syntax or attribute error aborts it.
//! - **Stable keys**: nodes/messages/signals live in SlotMap arenas with
//!   keys that stay valid for the lifetime of the database.
//! - **Fast lookups**: messages by id, name or quark; signals by name or
//!   quark within their message.
//! - **Attribute system**: `BA_DEF_`/`BA_` attributes resolved into typed
//!   integer/float/string buckets on every object.
//! - **Frame decoding**: [`Database::decode`] turns an id + payload into
//!   `(signal, physical value)` pairs, multiplexing included; decode errors
//!   stay local to the affected signal.
//!
//! ```no_run
//! let db = can_db::dbc::from_file("powertrain.dbc")?;
//! for (signal, value) in db.decode(0x40, &[0xFF, 0x3F, 0x00, 0x00, 0x00]) {
//!     println!("{} = {} {}", signal.name, value, signal.unit);
//! }
//! # Ok::<(), can_db::LoadError>(())
//! ```

pub mod dbc;
#[doc(hidden)]
pub mod types;

#[doc(inline)]
pub use crate::types::{
    database::{Database, MessageKey, NodeKey, SignalKey},
    errors::{DecodeError, LoadError, ParseError},
    message::Message,
    node::Node,
    object::Attributes,
    quark::Quark,
    signal::{ByteOrder, Decoded, MuxRole, Signal},
};

#[doc(inline)]
pub use crate::dbc::types::attributes::{AttrObject, AttributeData, AttributeDefinition};
