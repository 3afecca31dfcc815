//! One parser per top-level `.dbc` construct.
//!
//! Each rule is entered after the document loop has consumed the construct's
//! keyword; the rule parses the remainder (through the end of the line, or
//! the whole block for `BO_`/`NS_`) and folds the result into the
//! accumulator.

pub(crate) mod ba_;
pub(crate) mod ba_def_;
pub(crate) mod ba_def_def_;
pub(crate) mod bo_;
pub(crate) mod bs_;
pub(crate) mod bu_;
pub(crate) mod cm_;
pub(crate) mod ns_;
pub(crate) mod sg_;
pub(crate) mod val_;
pub(crate) mod val_table_;
pub(crate) mod version;
