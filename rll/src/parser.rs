//! Recursive descent parser for rung token streams.
//!
//! Grammar (each rung ends with `;`):
//!
//! ```text
//! rung          : input_list output_list ';' | output_list ';'
//! input_list    : (input_instruction | input_branch)+
//! input_branch  : '[' input_level ']' | '[' ']'
//! input_level   : alternatives separated by ',' (an alternative may be empty)
//! output_list   : output_seq | output_branch
//! output_seq    : output_instruction+
//! output_branch : '[' output_level (',' output_level)* ']'
//! output_level  : input_list? output_list
//! ```
//!
//! A bracket group is parsed generically and classified afterwards: when no
//! alternative contains an output instruction the group is an input branch
//! (empty alternatives are wires), otherwise it is an output branch and every
//! level must end in an output list. Doubled commas are therefore legal only
//! inside input branches.

use crate::ast::*;
use crate::error::{RungError, RungResult};
use crate::lexer::tokenize;
use crate::token::{Mnemonic, Token, TokenKind};

/// Parse rung text into an AST. Lexical diagnostics are dropped here; use
/// [`crate::compile_rung`] to surface them.
pub fn parse_rung(text: &str) -> RungResult<RungAst> {
    let (tokens, _) = tokenize(text);
    Parser::new(tokens).parse()
}

/// Parser over a lexed rung.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// A bracket group after classification.
enum Bracket {
    Input(Vec<InputLevel>),
    Output(Vec<OutputLevel>),
}

/// One comma-separated alternative of a bracket group, before the group is
/// classified as an input or output branch.
struct Alternative {
    inputs: Vec<InputElement>,
    outputs: Option<OutputList>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> RungResult<Token> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            _ => Err(self.err_unexpected(expected)),
        }
    }

    fn err_unexpected(&self, expected: &'static str) -> RungError {
        match self.peek() {
            Some(tok) => RungError::Unexpected {
                expected,
                found: tok.text.clone(),
                line: tok.line,
                pos: tok.pos,
            },
            None => RungError::UnexpectedEof { expected },
        }
    }

    /// Parse a complete rung and require end of input after the `;`.
    pub fn parse(mut self) -> RungResult<RungAst> {
        let mut inputs = Vec::new();

        // Input network: contacts and branches until the outputs start.
        let outputs = loop {
            match self.peek_kind() {
                Some(TokenKind::Mnemonic(m)) if m.is_input() => {
                    inputs.push(InputElement::Instruction(self.parse_input_instruction()?));
                }
                Some(TokenKind::LBra) => match self.parse_bracket()? {
                    Bracket::Input(levels) => inputs.push(InputElement::Branch(levels)),
                    // An output branch is the rung's whole output list.
                    Bracket::Output(levels) => break OutputList::Branch(levels),
                },
                Some(TokenKind::Mnemonic(_)) => break OutputList::Seq(self.parse_output_seq()?),
                _ => return Err(self.err_unexpected("instruction or '['")),
            }
        };

        self.expect(TokenKind::Semicolon, "';'")?;
        if self.peek().is_some() {
            return Err(self.err_unexpected("end of rung"));
        }
        Ok(RungAst { inputs, outputs })
    }

    /// One or more consecutive output instructions.
    fn parse_output_seq(&mut self) -> RungResult<Vec<OutputInstruction>> {
        let mut seq = Vec::new();
        while let Some(TokenKind::Mnemonic(m)) = self.peek_kind() {
            if !m.is_output() {
                break;
            }
            seq.push(self.parse_output_instruction()?);
        }
        if seq.is_empty() {
            return Err(self.err_unexpected("output instruction"));
        }
        Ok(seq)
    }

    /// Parse `[ … ]` generically and classify it.
    fn parse_bracket(&mut self) -> RungResult<Bracket> {
        let open = self.expect(TokenKind::LBra, "'['")?;
        let (open_line, open_pos) = (open.line, open.pos);

        // Empty branch: the rail is unchanged.
        if self.peek_kind() == Some(TokenKind::RBra) {
            self.advance();
            return Ok(Bracket::Input(Vec::new()));
        }

        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_alternative()?);
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.advance();
                }
                Some(TokenKind::RBra) => {
                    self.advance();
                    break;
                }
                _ => return Err(self.err_unexpected("',' or ']'")),
            }
        }

        let has_outputs = alternatives.iter().any(|a| a.outputs.is_some());
        if !has_outputs {
            return Ok(Bracket::Input(
                alternatives.into_iter().map(|a| a.inputs).collect(),
            ));
        }
        let mut levels = Vec::with_capacity(alternatives.len());
        for alt in alternatives {
            match alt.outputs {
                Some(outputs) => levels.push(OutputLevel {
                    inputs: alt.inputs,
                    outputs,
                }),
                None => {
                    return Err(RungError::LevelWithoutOutput {
                        line: open_line,
                        pos: open_pos,
                    })
                }
            }
        }
        Ok(Bracket::Output(levels))
    }

    /// Parse up to the next `,` or `]`: optional input series, then an
    /// optional output list. Nothing may follow the output list inside the
    /// alternative.
    fn parse_alternative(&mut self) -> RungResult<Alternative> {
        let mut inputs = Vec::new();
        let mut outputs: Option<OutputList> = None;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Comma) | Some(TokenKind::RBra) => break,
                _ if outputs.is_some() => return Err(self.err_unexpected("',' or ']'")),
                Some(TokenKind::Mnemonic(m)) if m.is_input() => {
                    inputs.push(InputElement::Instruction(self.parse_input_instruction()?));
                }
                Some(TokenKind::Mnemonic(_)) => {
                    outputs = Some(OutputList::Seq(self.parse_output_seq()?));
                }
                Some(TokenKind::LBra) => match self.parse_bracket()? {
                    Bracket::Input(levels) => inputs.push(InputElement::Branch(levels)),
                    Bracket::Output(levels) => outputs = Some(OutputList::Branch(levels)),
                },
                _ => return Err(self.err_unexpected("instruction, '[', ',' or ']'")),
            }
        }
        Ok(Alternative { inputs, outputs })
    }

    fn parse_input_instruction(&mut self) -> RungResult<InputInstruction> {
        let m = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Mnemonic(m)) => m,
            _ => return Err(self.err_unexpected("input instruction")),
        };
        self.expect(TokenKind::LPar, "'('")?;
        let ins = match m {
            Mnemonic::Xic => InputInstruction::Xic(self.parse_operand()?),
            Mnemonic::Xio => InputInstruction::Xio(self.parse_operand()?),
            Mnemonic::Ons => InputInstruction::Ons(self.parse_operand()?),
            Mnemonic::Equ | Mnemonic::Neq | Mnemonic::Geq | Mnemonic::Leq | Mnemonic::Grt => {
                let lhs = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let rhs = self.parse_operand()?;
                let op = match m {
                    Mnemonic::Equ => CmpOp::Equ,
                    Mnemonic::Neq => CmpOp::Neq,
                    Mnemonic::Geq => CmpOp::Geq,
                    Mnemonic::Leq => CmpOp::Leq,
                    _ => CmpOp::Grt,
                };
                InputInstruction::Cmp { op, lhs, rhs }
            }
            Mnemonic::Lim => {
                let low = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let test = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let high = self.parse_operand()?;
                InputInstruction::Lim { low, test, high }
            }
            // parse() only dispatches input mnemonics here
            _ => return Err(self.err_unexpected("input instruction")),
        };
        self.expect(TokenKind::RPar, "')'")?;
        Ok(ins)
    }

    fn parse_output_instruction(&mut self) -> RungResult<OutputInstruction> {
        let m = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Mnemonic(m)) => m,
            _ => return Err(self.err_unexpected("output instruction")),
        };
        self.expect(TokenKind::LPar, "'('")?;
        let ins = match m {
            Mnemonic::Ote => OutputInstruction::Ote(self.parse_operand()?),
            Mnemonic::Otu => OutputInstruction::Otu(self.parse_operand()?),
            Mnemonic::Otl => OutputInstruction::Otl(self.parse_operand()?),
            Mnemonic::Res => OutputInstruction::Res(self.parse_operand()?),
            Mnemonic::Clr => OutputInstruction::Clr(self.parse_operand()?),
            Mnemonic::Mov => {
                let src = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let dst = self.parse_operand()?;
                OutputInstruction::Mov { src, dst }
            }
            Mnemonic::Ton | Mnemonic::Tof | Mnemonic::Ctu => {
                let tag = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::UndefVal, "'?'")?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::UndefVal, "'?'")?;
                match m {
                    Mnemonic::Ton => OutputInstruction::Ton(tag),
                    Mnemonic::Tof => OutputInstruction::Tof(tag),
                    _ => OutputInstruction::Ctu(tag),
                }
            }
            Mnemonic::Jsr => {
                let routine = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::Number, "argument count")?;
                // Input/return parameters are accepted and ignored; only the
                // gated call is lowered.
                while self.peek_kind() == Some(TokenKind::Comma) {
                    self.advance();
                    self.parse_operand()?;
                }
                OutputInstruction::Jsr { routine }
            }
            Mnemonic::Add | Mnemonic::Sub | Mnemonic::Div => {
                let lhs = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let rhs = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let dst = self.parse_operand()?;
                let op = match m {
                    Mnemonic::Add => ArithOp::Add,
                    Mnemonic::Sub => ArithOp::Sub,
                    _ => ArithOp::Div,
                };
                OutputInstruction::Arith { op, lhs, rhs, dst }
            }
            Mnemonic::Cpt => {
                let dst = self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                let expr = self.parse_expr()?;
                OutputInstruction::Cpt { dst, expr }
            }
            Mnemonic::Cop => {
                self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.parse_operand()?;
                OutputInstruction::Unsupported(Mnemonic::Cop)
            }
            Mnemonic::Btd => {
                self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::Number, "bit position")?;
                self.expect(TokenKind::Comma, "','")?;
                self.parse_operand()?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::Number, "bit position")?;
                self.expect(TokenKind::Comma, "','")?;
                self.expect(TokenKind::Number, "length")?;
                OutputInstruction::Unsupported(Mnemonic::Btd)
            }
            Mnemonic::Msg => {
                self.parse_operand()?;
                OutputInstruction::Unsupported(Mnemonic::Msg)
            }
            // parse_output_seq only dispatches output mnemonics here
            _ => return Err(self.err_unexpected("output instruction")),
        };
        self.expect(TokenKind::RPar, "')'")?;
        Ok(ins)
    }

    /// parameter : TAG | COMM_TAG | NUMBER | '-' NUMBER
    fn parse_operand(&mut self) -> RungResult<Operand> {
        match self.peek_kind() {
            Some(TokenKind::Tag) => {
                let tok = self.expect(TokenKind::Tag, "parameter")?;
                Ok(Operand::Tag(tok.text))
            }
            Some(TokenKind::CommTag) => {
                let tok = self.expect(TokenKind::CommTag, "parameter")?;
                Ok(Operand::CommTag(tok.text))
            }
            Some(TokenKind::Number) => {
                let tok = self.expect(TokenKind::Number, "parameter")?;
                Ok(Operand::Number(tok.text))
            }
            Some(TokenKind::Minus) => {
                self.advance();
                let num = self.expect(TokenKind::Number, "number")?;
                Ok(Operand::Number(format!("-{}", num.text)))
            }
            _ => Err(self.err_unexpected("parameter")),
        }
    }

    /// Embedded CPT expression: `+ -` below `* /`, both left-associative,
    /// explicit parenthesization.
    fn parse_expr(&mut self) -> RungResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => ExprOp::Add,
                Some(TokenKind::Minus) => ExprOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> RungResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Times) => ExprOp::Mul,
                Some(TokenKind::Div) => ExprOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> RungResult<Expr> {
        if self.peek_kind() == Some(TokenKind::LPar) {
            self.advance();
            let inner = self.parse_expr()?;
            self.expect(TokenKind::RPar, "')'")?;
            return Ok(Expr::Paren(Box::new(inner)));
        }
        Ok(Expr::Operand(self.parse_operand()?))
    }
}
