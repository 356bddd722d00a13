//! L5X file reader for the ladder-logic translator.
//!
//! Parses the subset of Rockwell's L5X export format the translation
//! consumes (user-defined data types, decorated tag data, RLL routine
//! rungs) using quick-xml with serde for fast, typed parsing, then extracts
//! a translator-facing view of the project.
//!
//! # Example
//!
//! ```ignore
//! let xml = std::fs::read_to_string("project.L5X")?;
//! let project = l5x::from_str(&xml)?;
//! let extraction = l5x::extract(&project)?;
//! for program in &extraction.data.programs {
//!     println!("{}: {} routines", program.name, program.routines.len());
//! }
//! ```
//!
//! The document is parsed once per invocation and the extracted structure is
//! passed around explicitly; the reader keeps no cached state.

mod error;
mod extract;
mod model;

pub use error::{Error, Result};
pub use extract::{
    extract, BitField, Extraction, ProgramData, ProjectData, RoutineData, RungData, TagDecl,
    TagValue, TypeMember, UserType,
};
pub use model::*;

/// Parse an L5X XML string into the typed project structure.
pub fn from_str(xml: &str) -> Result<Project> {
    Ok(quick_xml::de::from_str(xml)?)
}
