//! Rung-to-function assembly.
//!
//! Each routine becomes one `void <name>()` function. Per rung: an echo
//! comment, the optional `<CBEFORE!…!>` payload, the compiled statement
//! sequence (or a `// Syntax Error` marker on parse failure), the optional
//! `<CAFTER!…!>` payload, and a blank line. Syntax errors are per-rung: the
//! rest of the routine still translates.

use l5x::RoutineData;

/// Emit a routine. Diagnostics (syntax errors, ignored instructions,
/// skipped characters) are appended with their program/routine/rung path.
pub fn emit_routine(
    out: &mut String,
    program: &str,
    routine: &RoutineData,
    diagnostics: &mut Vec<String>,
) {
    out.push_str(&format!("void {}() {{\n", routine.name));
    for rung in &routine.rungs {
        out.push_str(&format!(
            "    // (Rung {}) {}\n",
            rung.number,
            collapse_whitespace(&rung.logic)
        ));

        let comment = rung.comment.as_deref();
        if let Some(payload) = directive_payload(comment, "<CBEFORE!") {
            out.push_str(payload);
            out.push('\n');
        }

        match rll::compile_rung(&rung.logic) {
            Ok(compiled) => {
                for warning in compiled.warnings {
                    diagnostics.push(format!(
                        "{}/{}/Rung#{}: {}",
                        program, routine.name, rung.number, warning
                    ));
                }
                out.push_str("    ");
                out.push_str(&compiled.code);
                out.push('\n');
            }
            Err(error) => {
                diagnostics.push(format!(
                    "{}/{}/Rung#{}: {}",
                    program, routine.name, rung.number, error
                ));
                out.push_str("    // Syntax Error\n");
            }
        }

        if let Some(payload) = directive_payload(comment, "<CAFTER!") {
            out.push_str(payload);
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str("}\n\n");
}

/// Payload of a `<CBEFORE!…!>` / `<CAFTER!…!>` directive, verbatim.
fn directive_payload<'a>(comment: Option<&'a str>, open: &str) -> Option<&'a str> {
    let comment = comment?;
    let start = comment.find(open)? + open.len();
    let end = comment[start..].find("!>")? + start;
    Some(&comment[start..end])
}

/// The rung echo lives in a line comment; fold any embedded newlines.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use l5x::RungData;

    fn routine(rungs: Vec<RungData>) -> RoutineData {
        RoutineData {
            name: "MainRoutine".to_string(),
            rungs,
        }
    }

    fn rung(number: u32, logic: &str, comment: Option<&str>) -> RungData {
        RungData {
            number,
            logic: logic.to_string(),
            comment: comment.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_basic_assembly() {
        let mut out = String::new();
        let mut diagnostics = Vec::new();
        emit_routine(
            &mut out,
            "MainProgram",
            &routine(vec![rung(0, "XIC(a)OTE(b);", None)]),
            &mut diagnostics,
        );
        assert_eq!(
            out,
            "void MainRoutine() {\n\
             \x20   // (Rung 0) XIC(a)OTE(b);\n\
             \x20   clear();push(true);push(a);and();b=acc();\n\
             \n\
             }\n\n"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_syntax_error_recovery() {
        // P7: the bad rung is replaced, its neighbors still compile
        let mut out = String::new();
        let mut diagnostics = Vec::new();
        emit_routine(
            &mut out,
            "MainProgram",
            &routine(vec![
                rung(0, "XIC(a)OTE(b);", None),
                rung(1, "XIC(OTE(x));", None),
                rung(2, "XIC(c)OTE(d);", None),
            ]),
            &mut diagnostics,
        );
        assert!(out.contains("    // Syntax Error\n"));
        assert!(out.contains("clear();push(true);push(a);and();b=acc();"));
        assert!(out.contains("clear();push(true);push(c);and();d=acc();"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("MainProgram/MainRoutine/Rung#1:"));
    }

    #[test]
    fn test_comment_directives() {
        let mut out = String::new();
        let mut diagnostics = Vec::new();
        emit_routine(
            &mut out,
            "MainProgram",
            &routine(vec![rung(
                0,
                "OTE(a);",
                Some("setup <CBEFORE!int guard = 0;!> teardown <CAFTER!guard = 1;!>"),
            )]),
            &mut diagnostics,
        );
        let expected = "void MainRoutine() {\n\
             \x20   // (Rung 0) OTE(a);\n\
             int guard = 0;\n\
             \x20   clear();push(true);a=acc();\n\
             guard = 1;\n\
             \n\
             }\n\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_multiline_logic_collapsed_in_echo() {
        let mut out = String::new();
        let mut diagnostics = Vec::new();
        emit_routine(
            &mut out,
            "MainProgram",
            &routine(vec![rung(0, "XIC(a)\nOTE(b);", None)]),
            &mut diagnostics,
        );
        assert!(out.contains("// (Rung 0) XIC(a) OTE(b);\n"));
    }

    #[test]
    fn test_unsupported_instruction_diagnostic_path() {
        let mut out = String::new();
        let mut diagnostics = Vec::new();
        emit_routine(
            &mut out,
            "MainProgram",
            &routine(vec![rung(0, "XIC(a)COP(x,y,1);", None)]),
            &mut diagnostics,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0],
            "MainProgram/MainRoutine/Rung#0: Instruction COP is not supported. Instruction was ignored."
        );
    }

    #[test]
    fn test_directive_payload_extraction() {
        assert_eq!(
            directive_payload(Some("x <CBEFORE!a = 1;!> y"), "<CBEFORE!"),
            Some("a = 1;")
        );
        assert_eq!(directive_payload(Some("no directives"), "<CBEFORE!"), None);
        assert_eq!(directive_payload(None, "<CBEFORE!"), None);
        // Unterminated directive is ignored
        assert_eq!(directive_payload(Some("<CAFTER!oops"), "<CAFTER!"), None);
    }
}
