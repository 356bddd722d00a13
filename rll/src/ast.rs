//! AST types for parsed rungs.
//!
//! The tree is typed by rail direction: an input network narrowing the rail
//! feeds one output list. Parallel input branches hold alternatives (an empty
//! alternative is a bare wire); parallel output branches hold levels, each an
//! optional gating input series plus its own output list.

use std::fmt;

use crate::token::Mnemonic;

/// A parsed rung: optional input network, then one output list.
#[derive(Debug, Clone, PartialEq)]
pub struct RungAst {
    pub inputs: Vec<InputElement>,
    pub outputs: OutputList,
}

/// Element of an input network.
#[derive(Debug, Clone, PartialEq)]
pub enum InputElement {
    Instruction(InputInstruction),
    /// Parallel alternatives; any true alternative conducts. An empty
    /// alternative is a wire and an empty branch is a no-op.
    Branch(Vec<InputLevel>),
}

/// One alternative of an input branch.
pub type InputLevel = Vec<InputElement>;

/// Instructions that read and narrow the rail.
#[derive(Debug, Clone, PartialEq)]
pub enum InputInstruction {
    /// Examine-if-closed: rail AND tag
    Xic(Operand),
    /// Examine-if-open: rail AND NOT tag
    Xio(Operand),
    /// One-shot on the storage bit
    Ons(Operand),
    /// Binary comparison gating the rail
    Cmp {
        op: CmpOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// Limit test (circular when low > high)
    Lim {
        low: Operand,
        test: Operand,
        high: Operand,
    },
}

/// Comparison operators of the input comparison instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Equ,
    Neq,
    Geq,
    Leq,
    Grt,
}

impl CmpOp {
    /// The C operator. `LEQ` is `<=` per the instruction's contract.
    pub fn c_op(&self) -> &'static str {
        match self {
            CmpOp::Equ => "==",
            CmpOp::Neq => "!=",
            CmpOp::Geq => ">=",
            CmpOp::Leq => "<=",
            CmpOp::Grt => ">",
        }
    }
}

/// The output part of a rung or branch level.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputList {
    /// Coils side by side, all driven by the same rail
    Seq(Vec<OutputInstruction>),
    /// Parallel levels, each restored to the pre-branch rail
    Branch(Vec<OutputLevel>),
}

/// One level of an output branch.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLevel {
    /// Contacts gating this level (may be empty)
    pub inputs: Vec<InputElement>,
    pub outputs: OutputList,
}

/// Instructions driven by the rail.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputInstruction {
    /// Energize: tag follows the rail
    Ote(Operand),
    /// Unlatch when the rail is true
    Otu(Operand),
    /// Latch when the rail is true
    Otl(Operand),
    /// Reset a timer/counter accumulator
    Res(Operand),
    /// Clear to zero when the rail is true
    Clr(Operand),
    /// Move; destination is the second operand
    Mov { src: Operand, dst: Operand },
    /// Timer on-delay (runtime call)
    Ton(Operand),
    /// Timer off-delay (runtime call)
    Tof(Operand),
    /// Count-up (runtime call)
    Ctu(Operand),
    /// Gated subroutine call
    Jsr { routine: Operand },
    /// Gated three-operand arithmetic
    Arith {
        op: ArithOp,
        lhs: Operand,
        rhs: Operand,
        dst: Operand,
    },
    /// Gated compute of an embedded expression
    Cpt { dst: Operand, expr: Expr },
    /// Structurally recognized but not lowered (COP, BTD, MSG)
    Unsupported(Mnemonic),
}

/// Arithmetic operators of the three-operand instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Div,
}

impl ArithOp {
    pub fn c_op(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Div => "/",
        }
    }
}

/// An embedded CPT expression. Parenthesization is preserved as written.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Operand(Operand),
    Paren(Box<Expr>),
    Binary {
        op: ExprOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Expression operators; `*` and `/` bind tighter than `+` and `-`, all
/// left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ExprOp {
    pub fn c_op(&self) -> &'static str {
        match self {
            ExprOp::Add => "+",
            ExprOp::Sub => "-",
            ExprOp::Mul => "*",
            ExprOp::Div => "/",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Operand(op) => f.write_str(op.text()),
            Expr::Paren(inner) => write!(f, "({})", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "{}{}{}", lhs, op.c_op(), rhs),
        }
    }
}

/// An instruction parameter. The text is emitted into C verbatim, with no
/// renaming or escaping.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Tag(String),
    CommTag(String),
    Number(String),
}

impl Operand {
    pub fn text(&self) -> &str {
        match self {
            Operand::Tag(s) | Operand::CommTag(s) | Operand::Number(s) => s,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_display() {
        // ((1.0-x)*y)+z
        let expr = Expr::Binary {
            op: ExprOp::Add,
            lhs: Box::new(Expr::Paren(Box::new(Expr::Binary {
                op: ExprOp::Mul,
                lhs: Box::new(Expr::Paren(Box::new(Expr::Binary {
                    op: ExprOp::Sub,
                    lhs: Box::new(Expr::Operand(Operand::Number("1.0".into()))),
                    rhs: Box::new(Expr::Operand(Operand::Tag("x".into()))),
                }))),
                rhs: Box::new(Expr::Operand(Operand::Tag("y".into()))),
            }))),
            rhs: Box::new(Expr::Operand(Operand::Tag("z".into()))),
        };
        assert_eq!(expr.to_string(), "((1.0-x)*y)+z");
    }

    #[test]
    fn test_cmp_ops() {
        assert_eq!(CmpOp::Leq.c_op(), "<=");
        assert_eq!(CmpOp::Grt.c_op(), ">");
    }
}
