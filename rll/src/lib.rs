//! RLL (Relay Ladder Logic) rung compiler.
//!
//! Compiles the text content of Rockwell ladder-logic rungs into C statement
//! sequences over a small Boolean evaluation stack provided by the generated
//! program's runtime.
//!
//! The pipeline is lex → parse → lower: the lexer produces a token stream
//! with reserved-mnemonic classification, the parser builds an explicit rung
//! AST, and a separate lowering pass emits the stack-machine C text.
//!
//! # Example
//!
//! ```
//! use rll::compile_rung;
//!
//! let compiled = compile_rung("XIC(Start)OTE(Motor);").unwrap();
//! assert_eq!(compiled.code, "clear();push(true);push(Start);and();Motor=acc();");
//! ```
//!
//! # Error handling
//!
//! Lexical errors (illegal characters) are recoverable: the character is
//! skipped, a diagnostic is collected, and compilation continues. Syntax
//! errors fail the individual rung; callers translating whole routines
//! recover per rung.

mod ast;
mod error;
mod lexer;
mod lower;
mod parser;
mod token;

pub use ast::*;
pub use error::{RungError, RungResult};
pub use lexer::{tokenize, LexDiagnostic, Lexer};
pub use lower::{compile_rung, lower_rung, CompiledRung};
pub use parser::{parse_rung, Parser};
pub use token::{Mnemonic, Token, TokenKind};
