use crate::types::object::Attributes;

/// A network node (`BU_` entry) and its resolved metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: String,
    /// Associated comment (DBC `CM_ BU_` section).
    pub description: Option<String>,
    pub attributes: Attributes,
}
