//! Lowering from rung AST to C statements over the evaluation stack.
//!
//! Every rung lowers to one straight-line statement sequence against the
//! runtime's Boolean stack (`clear`/`push`/`pop`/`acc`/`and`/`or`). The rail
//! value sits on top of the stack throughout; branches pop everything they
//! push except their single result, so the stack is balanced between
//! adjacent elements.

use crate::ast::*;
use crate::error::RungResult;
use crate::lexer::tokenize;
use crate::parser::Parser;

/// Result of compiling one rung.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRung {
    /// The C statement sequence, starting with the `clear();push(true);`
    /// prologue
    pub code: String,
    /// Recoverable diagnostics: skipped illegal characters and ignored
    /// unsupported instructions
    pub warnings: Vec<String>,
}

/// Compile rung text to its C statement sequence.
///
/// Lexical errors are recoverable (reported in `warnings`); a syntax error
/// fails the rung and the caller recovers per rung.
pub fn compile_rung(text: &str) -> RungResult<CompiledRung> {
    let (tokens, lex_diagnostics) = tokenize(text);
    let ast = Parser::new(tokens).parse()?;
    let mut warnings: Vec<String> = lex_diagnostics.iter().map(|d| d.to_string()).collect();
    let code = lower_rung(&ast, &mut warnings);
    Ok(CompiledRung { code, warnings })
}

/// Lower a parsed rung. Warnings for ignored instructions are appended to
/// `warnings`.
pub fn lower_rung(rung: &RungAst, warnings: &mut Vec<String>) -> String {
    let mut out = String::from("clear();push(true);");
    for element in &rung.inputs {
        lower_input_element(element, &mut out);
    }
    lower_output_list(&rung.outputs, &mut out, warnings);
    out
}

fn lower_input_element(element: &InputElement, out: &mut String) {
    match element {
        InputElement::Instruction(ins) => lower_input_instruction(ins, out),
        InputElement::Branch(levels) => {
            // Empty branch: the rail is unchanged.
            if levels.is_empty() {
                return;
            }
            // false seeds the OR accumulator, true is the rail for the first
            // alternative; each comma folds the finished alternative into the
            // accumulator. An empty alternative leaves its rail at true.
            out.push_str("push(false);push(true);");
            for (i, level) in levels.iter().enumerate() {
                if i > 0 {
                    out.push_str("or();push(true);");
                }
                for element in level {
                    lower_input_element(element, out);
                }
            }
            out.push_str("or();and();");
        }
    }
}

fn lower_input_instruction(ins: &InputInstruction, out: &mut String) {
    match ins {
        InputInstruction::Xic(t) => {
            out.push_str(&format!("push({});and();", t));
        }
        InputInstruction::Xio(t) => {
            out.push_str(&format!("push(!{});and();", t));
        }
        InputInstruction::Ons(t) => {
            out.push_str(&format!(
                "if({t}==acc()){{if(acc()){{pop();push(false);}}}}else{{{t}=acc();}}",
                t = t
            ));
        }
        InputInstruction::Cmp { op, lhs, rhs } => {
            out.push_str(&format!("push({}{}{});and();", lhs, op.c_op(), rhs));
        }
        InputInstruction::Lim { low, test, high } => {
            // Ordered bounds: pass inside the closed interval. Inverted
            // bounds: pass outside the open interval (circular limit).
            out.push_str(&format!(
                "if(acc()){{if({low}<={high}){{if({low}>{test}||{test}>{high}){{pop();push(false);}}}}else{{if({low}>{test}&&{test}>{high}){{pop();push(false);}}}}}}",
                low = low,
                test = test,
                high = high
            ));
        }
    }
}

fn lower_output_list(list: &OutputList, out: &mut String, warnings: &mut Vec<String>) {
    match list {
        OutputList::Seq(instructions) => {
            for ins in instructions {
                lower_output_instruction(ins, out, warnings);
            }
        }
        OutputList::Branch(levels) => {
            // Duplicate the pre-branch rail for the first level; between
            // levels drop the level's rail and re-duplicate the original,
            // which is on top again after the pop.
            out.push_str("push(acc());");
            for (i, level) in levels.iter().enumerate() {
                if i > 0 {
                    out.push_str("pop();push(acc());");
                }
                for element in &level.inputs {
                    lower_input_element(element, out);
                }
                lower_output_list(&level.outputs, out, warnings);
            }
            out.push_str("pop();");
        }
    }
}

fn lower_output_instruction(ins: &OutputInstruction, out: &mut String, warnings: &mut Vec<String>) {
    match ins {
        OutputInstruction::Ote(t) => {
            out.push_str(&format!("{}=acc();", t));
        }
        OutputInstruction::Otu(t) => {
            out.push_str(&format!("if(acc()){}=0;", t));
        }
        OutputInstruction::Otl(t) => {
            out.push_str(&format!("if(acc()){}=1;", t));
        }
        OutputInstruction::Res(t) => {
            out.push_str(&format!("if(acc()){}.ACC=0;", t));
        }
        OutputInstruction::Clr(t) => {
            out.push_str(&format!("if(acc()){{{}=0;}};", t));
        }
        OutputInstruction::Mov { src, dst } => {
            out.push_str(&format!("if(acc()){}={};", dst, src));
        }
        OutputInstruction::Ton(t) => {
            out.push_str(&format!("ton(acc(), &{});", t));
        }
        OutputInstruction::Tof(t) => {
            out.push_str(&format!("tof(acc(), &{});", t));
        }
        OutputInstruction::Ctu(t) => {
            out.push_str(&format!("ctu(acc(), &{});", t));
        }
        OutputInstruction::Jsr { routine } => {
            out.push_str(&format!("if(acc()){}();", routine));
        }
        OutputInstruction::Arith { op, lhs, rhs, dst } => {
            out.push_str(&format!(
                "if(acc()){{{}={}{}{};}};",
                dst,
                lhs,
                op.c_op(),
                rhs
            ));
        }
        OutputInstruction::Cpt { dst, expr } => {
            out.push_str(&format!("if(acc()){{{}={};}};", dst, expr));
        }
        OutputInstruction::Unsupported(m) => {
            warnings.push(format!(
                "Instruction {} is not supported. Instruction was ignored.",
                m.as_str()
            ));
        }
    }
}
