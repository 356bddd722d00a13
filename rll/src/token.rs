//! Token model for RLL rung text.

use std::fmt;

/// Reserved instruction mnemonics.
///
/// A lexeme that matches the tag shape is reclassified to its mnemonic kind
/// when it is one of these words; a mnemonic is never an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Xic,
    Xio,
    Ote,
    Otu,
    Otl,
    Ton,
    Tof,
    Ons,
    Res,
    Mov,
    Ctu,
    Equ,
    Geq,
    Neq,
    Leq,
    Grt,
    Cop,
    Cpt,
    Add,
    Sub,
    Clr,
    Lim,
    Div,
    Btd,
    Jsr,
    Msg,
}

impl Mnemonic {
    /// Look up a reserved word. Matching is exact (mnemonics are uppercase).
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "XIC" => Some(Mnemonic::Xic),
            "XIO" => Some(Mnemonic::Xio),
            "OTE" => Some(Mnemonic::Ote),
            "OTU" => Some(Mnemonic::Otu),
            "OTL" => Some(Mnemonic::Otl),
            "TON" => Some(Mnemonic::Ton),
            "TOF" => Some(Mnemonic::Tof),
            "ONS" => Some(Mnemonic::Ons),
            "RES" => Some(Mnemonic::Res),
            "MOV" => Some(Mnemonic::Mov),
            "CTU" => Some(Mnemonic::Ctu),
            "EQU" => Some(Mnemonic::Equ),
            "GEQ" => Some(Mnemonic::Geq),
            "NEQ" => Some(Mnemonic::Neq),
            "LEQ" => Some(Mnemonic::Leq),
            "GRT" => Some(Mnemonic::Grt),
            "COP" => Some(Mnemonic::Cop),
            "CPT" => Some(Mnemonic::Cpt),
            "ADD" => Some(Mnemonic::Add),
            "SUB" => Some(Mnemonic::Sub),
            "CLR" => Some(Mnemonic::Clr),
            "LIM" => Some(Mnemonic::Lim),
            "DIV" => Some(Mnemonic::Div),
            "BTD" => Some(Mnemonic::Btd),
            "JSR" => Some(Mnemonic::Jsr),
            "MSG" => Some(Mnemonic::Msg),
            _ => None,
        }
    }

    /// The mnemonic as written in rung text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mnemonic::Xic => "XIC",
            Mnemonic::Xio => "XIO",
            Mnemonic::Ote => "OTE",
            Mnemonic::Otu => "OTU",
            Mnemonic::Otl => "OTL",
            Mnemonic::Ton => "TON",
            Mnemonic::Tof => "TOF",
            Mnemonic::Ons => "ONS",
            Mnemonic::Res => "RES",
            Mnemonic::Mov => "MOV",
            Mnemonic::Ctu => "CTU",
            Mnemonic::Equ => "EQU",
            Mnemonic::Geq => "GEQ",
            Mnemonic::Neq => "NEQ",
            Mnemonic::Leq => "LEQ",
            Mnemonic::Grt => "GRT",
            Mnemonic::Cop => "COP",
            Mnemonic::Cpt => "CPT",
            Mnemonic::Add => "ADD",
            Mnemonic::Sub => "SUB",
            Mnemonic::Clr => "CLR",
            Mnemonic::Lim => "LIM",
            Mnemonic::Div => "DIV",
            Mnemonic::Btd => "BTD",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Msg => "MSG",
        }
    }

    /// True for instructions that read and narrow the rail (contacts,
    /// comparisons, the one-shot and the limit test).
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Mnemonic::Xic
                | Mnemonic::Xio
                | Mnemonic::Ons
                | Mnemonic::Equ
                | Mnemonic::Geq
                | Mnemonic::Neq
                | Mnemonic::Leq
                | Mnemonic::Grt
                | Mnemonic::Lim
        )
    }

    /// True for instructions driven by the rail (coils, moves, timers,
    /// counters, arithmetic, subroutine calls and the ignored set).
    pub fn is_output(&self) -> bool {
        !self.is_input()
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds produced by the rung lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LPar,
    /// `)`
    RPar,
    /// `[`
    LBra,
    /// `]`
    RBra,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `?` - undefined/inferred value placeholder
    UndefVal,
    /// Decimal literal with optional fraction and exponent
    Number,
    /// Tag reference: object path with optional indices and terminal bit
    Tag,
    /// Communication-path tag: `module:slot:port.path`
    CommTag,
    /// `+` (CPT expressions)
    Plus,
    /// `-` (CPT expressions and negative literals)
    Minus,
    /// `*` (CPT expressions)
    Times,
    /// `/` (CPT expressions)
    Div,
    /// Reserved instruction mnemonic
    Mnemonic(Mnemonic),
}

/// A lexed token with its verbatim text and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line number, tracked across embedded newlines
    pub line: u32,
    /// Byte offset in the rung text
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_lookup() {
        assert_eq!(Mnemonic::from_word("XIC"), Some(Mnemonic::Xic));
        assert_eq!(Mnemonic::from_word("MSG"), Some(Mnemonic::Msg));
        assert_eq!(Mnemonic::from_word("NOP"), None);
        assert_eq!(Mnemonic::from_word("xic"), None); // case-sensitive
        assert_eq!(Mnemonic::from_word("XICS"), None);
    }

    #[test]
    fn test_input_output_partition() {
        assert!(Mnemonic::Xic.is_input());
        assert!(Mnemonic::Lim.is_input());
        assert!(Mnemonic::Ote.is_output());
        assert!(Mnemonic::Jsr.is_output());
        assert!(Mnemonic::Msg.is_output());
        // Every mnemonic is exactly one of the two
        for word in [
            "XIC", "XIO", "OTE", "OTU", "OTL", "TON", "TOF", "ONS", "RES", "MOV", "CTU", "EQU",
            "GEQ", "NEQ", "LEQ", "GRT", "COP", "CPT", "ADD", "SUB", "CLR", "LIM", "DIV", "BTD",
            "JSR", "MSG",
        ] {
            let m = Mnemonic::from_word(word).unwrap();
            assert_ne!(m.is_input(), m.is_output());
        }
    }
}
