//! L5X to C translation.
//!
//! Orchestrates the pipeline: read and extract the L5X project, emit the
//! scan-loop runtime preamble, the user data types in dependency order, the
//! tag declarations with their initializers, one C function per ladder
//! routine, and a scan `main()` calling each program's main routine.
//!
//! Recoverable problems (per-rung syntax errors, skipped tags, ignored
//! instructions) are collected as diagnostics and never fail the run; fatal
//! errors (unreadable input, malformed XML, type cycles) are returned as
//! [`Error`] values.

pub mod ctypes;
pub mod routine;
pub mod tags;

mod error;

use std::path::Path;

pub use error::{Error, Result};

/// The scan-loop runtime preamble; `$stack_size` and `$scan_time` are
/// substituted textually.
const PLC_TEMPLATE: &str = include_str!("../templates/plcmodel.c");

/// Translation parameters.
#[derive(Debug, Clone)]
pub struct Options {
    /// Capacity of the generated evaluation stack
    pub stack_size: u32,
    /// Scan period of the generated loop, in milliseconds
    pub scan_time: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stack_size: 1000,
            scan_time: 100,
        }
    }
}

/// A finished translation.
#[derive(Debug, Clone)]
pub struct Translation {
    /// The complete C translation unit
    pub c_source: String,
    /// Recoverable diagnostics gathered along the way
    pub diagnostics: Vec<String>,
}

/// Read, extract and translate an L5X file, writing the C output.
/// Returns the recoverable diagnostics.
pub fn translate_file(input: &Path, output: &Path, options: &Options) -> Result<Vec<String>> {
    let xml = std::fs::read_to_string(input).map_err(|e| Error::FileRead {
        path: input.display().to_string(),
        source: e,
    })?;
    let translation = translate_str(&xml, options)?;
    std::fs::write(output, &translation.c_source).map_err(|e| Error::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;
    Ok(translation.diagnostics)
}

/// Translate an L5X document held in memory.
pub fn translate_str(xml: &str, options: &Options) -> Result<Translation> {
    let project = l5x::from_str(xml)?;
    translate(&project, options)
}

/// Translate a parsed project.
pub fn translate(project: &l5x::Project, options: &Options) -> Result<Translation> {
    let extraction = l5x::extract(project)?;
    let data = extraction.data;
    let mut diagnostics = extraction.warnings;
    let mut out = String::new();

    out.push_str(
        &PLC_TEMPLATE
            .replace("$stack_size", &options.stack_size.to_string())
            .replace("$scan_time", &options.scan_time.to_string()),
    );
    out.push('\n');

    if !data.data_types.is_empty() {
        out.push_str("/* User-defined data types */\n\n");
        ctypes::emit_data_types(&mut out, &data.data_types)?;
    }

    if !data.controller_tags.is_empty() {
        out.push_str("/* Controller tags */\n\n");
        for tag in &data.controller_tags {
            tags::emit_tag(&mut out, tag);
        }
        out.push('\n');
    }

    // Forward declarations so JSR targets resolve regardless of routine
    // order.
    let mut have_routines = false;
    for program in &data.programs {
        for r in &program.routines {
            out.push_str(&format!("void {}();\n", r.name));
            have_routines = true;
        }
    }
    if have_routines {
        out.push('\n');
    }

    for program in &data.programs {
        out.push_str(&format!("/* Program {} */\n\n", program.name));
        if !program.tags.is_empty() {
            for tag in &program.tags {
                tags::emit_tag(&mut out, tag);
            }
            out.push('\n');
        }
        for r in &program.routines {
            routine::emit_routine(&mut out, &program.name, r, &mut diagnostics);
        }
    }

    emit_scan_main(&mut out, &data, &mut diagnostics);

    Ok(Translation {
        c_source: out,
        diagnostics,
    })
}

/// The scan loop: each program's main routine in document order, then one
/// scan-time sleep.
fn emit_scan_main(out: &mut String, data: &l5x::ProjectData, diagnostics: &mut Vec<String>) {
    out.push_str("int main() {\n    for (;;) {\n");
    for program in &data.programs {
        match &program.main_routine {
            Some(main) if program.routines.iter().any(|r| &r.name == main) => {
                out.push_str(&format!("        {}();\n", main));
            }
            Some(main) => {
                diagnostics.push(format!(
                    "Program {}: main routine {} not found. Program is skipped by the scan loop.",
                    program.name, main
                ));
            }
            None => {
                diagnostics.push(format!(
                    "Program {} has no main routine. Program is skipped by the scan loop.",
                    program.name
                ));
            }
        }
    }
    out.push_str("        plc_sleep(SCAN_TIME);\n    }\n    return 0;\n}\n");
}
