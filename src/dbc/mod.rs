//! `.dbc` file parsing.
//!
//! Use [`from_file`] to load a database from disk, or [`from_str`] when the
//! text is already in memory. Loading is atomic: the result is either a
//! fully resolved [`Database`] or a [`LoadError`], never a partial database.
//!
//! The document loop skips blank lines, reads the leading keyword of the
//! next construct and commits to the matching grammar rule; the keywords are
//! mutually exclusive, so there is no cross-construct backtracking.

pub(crate) mod grammar;
pub(crate) mod scan;
pub mod types;

use std::fs::File;
use std::io::Read;

use encoding_rs::WINDOWS_1252;

use crate::dbc::scan::Scanner;
use crate::dbc::types::ast::RawDatabase;
use crate::types::database::Database;
use crate::types::errors::LoadError;

/// Parses a `.dbc` file into a [`Database`].
///
/// The file must carry the `.dbc` extension. Bytes are decoded as
/// Windows-1252, the encoding the usual authoring tools emit.
pub fn from_file(path: &str) -> Result<Database, LoadError> {
    if !path.ends_with(".dbc") {
        return Err(LoadError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let mut file = File::open(path).map_err(|source| LoadError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| LoadError::Read {
            path: path.to_string(),
            source,
        })?;

    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    from_str(&text)
}

/// Parses `.dbc` text into a [`Database`].
pub fn from_str(text: &str) -> Result<Database, LoadError> {
    let mut scan = Scanner::new(text);
    let mut raw = RawDatabase::default();

    loop {
        scan.skip_blank_lines();
        if scan.is_eof() {
            break;
        }
        let keyword = scan.identifier()?;
        match keyword {
            "VERSION" => grammar::version::parse(&mut scan, &mut raw)?,
            "NS_" => grammar::ns_::parse(&mut scan, &mut raw)?,
            "BS_" => grammar::bs_::parse(&mut scan, &mut raw)?,
            "BU_" => grammar::bu_::parse(&mut scan, &mut raw)?,
            "BO_" => grammar::bo_::parse(&mut scan, &mut raw)?,
            "CM_" => grammar::cm_::parse(&mut scan, &mut raw)?,
            "BA_DEF_DEF_" => grammar::ba_def_def_::parse(&mut scan, &mut raw)?,
            "BA_DEF_" => grammar::ba_def_::parse(&mut scan, &mut raw)?,
            "BA_" => grammar::ba_::parse(&mut scan, &mut raw)?,
            "VAL_TABLE_" => grammar::val_table_::parse(&mut scan, &mut raw)?,
            "VAL_" => grammar::val_::parse(&mut scan, &mut raw)?,
            other => return Err(scan.unknown_keyword(other).into()),
        }
    }

    Database::from_raw(&raw)
}
