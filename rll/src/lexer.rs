//! Lexer for RLL rung text.
//!
//! Hand-written maximal-munch scanner. A lexeme is first matched against the
//! tag shape and then reclassified if it is a reserved mnemonic; the
//! communication-path form (`module:slot:port.path`) is more specific than a
//! plain tag and takes precedence where both match.
//!
//! Illegal characters are recoverable: each one produces a single diagnostic,
//! is skipped, and lexing continues.

use std::fmt;

use crate::token::{Mnemonic, Token, TokenKind};

/// Diagnostic for a skipped illegal character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexDiagnostic {
    pub ch: char,
    pub line: u32,
    pub pos: usize,
}

impl fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "illegal character '{}' at position {} (skipped)",
            self.ch, self.pos
        )
    }
}

/// Lexer over a single rung's text.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    diagnostics: Vec<LexDiagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics collected so far (illegal characters).
    pub fn diagnostics(&self) -> &[LexDiagnostic] {
        &self.diagnostics
    }

    /// Consume the lexer, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<LexDiagnostic> {
        self.diagnostics
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();
            let c = self.peek()?;
            let start = self.pos;
            let line = self.line;

            let simple = match c {
                '(' => Some(TokenKind::LPar),
                ')' => Some(TokenKind::RPar),
                '[' => Some(TokenKind::LBra),
                ']' => Some(TokenKind::RBra),
                ',' => Some(TokenKind::Comma),
                ';' => Some(TokenKind::Semicolon),
                '?' => Some(TokenKind::UndefVal),
                '+' => Some(TokenKind::Plus),
                '-' => Some(TokenKind::Minus),
                '*' => Some(TokenKind::Times),
                '/' => Some(TokenKind::Div),
                _ => None,
            };
            if let Some(kind) = simple {
                self.advance();
                return Some(Token::new(kind, &self.input[start..self.pos], line, start));
            }

            if c.is_ascii_digit() {
                return Some(self.lex_number(start, line));
            }
            if c == '.' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit()) {
                return Some(self.lex_number(start, line));
            }
            if c.is_ascii_alphabetic() || c == '_' {
                return Some(self.lex_word(start, line));
            }

            // Illegal character: report once, skip, keep lexing.
            self.diagnostics.push(LexDiagnostic {
                ch: c,
                line,
                pos: start,
            });
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.advance();
            } else if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// `[0-9]*\.?[0-9]+([eE][+-]?[0-9]+)?`
    fn lex_number(&mut self, start: usize, line: u32) -> Token {
        self.eat_digits();
        if self.peek() == Some('.') && self.peek_at(1).map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            self.eat_digits();
        }
        // Exponent only if well-formed; otherwise leave the 'e' for the next token
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut k = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                k = 2;
            }
            if self.peek_at(k).map_or(false, |c| c.is_ascii_digit()) {
                self.advance(); // e
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.eat_digits();
            }
        }
        Token::new(
            TokenKind::Number,
            &self.input[start..self.pos],
            line,
            start,
        )
    }

    fn eat_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Letter-or-underscore followed by letters/digits/underscores.
    fn eat_id(&mut self) {
        self.advance();
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
    }

    /// Identifier-shaped lexeme: a communication-path tag, a reserved
    /// mnemonic, or a plain tag.
    fn lex_word(&mut self, start: usize, line: u32) -> Token {
        self.eat_id();

        if self.peek() == Some(':') && self.try_comm_tag() {
            return Token::new(
                TokenKind::CommTag,
                &self.input[start..self.pos],
                line,
                start,
            );
        }

        self.eat_tag_continuation();
        let text = &self.input[start..self.pos];
        let kind = match Mnemonic::from_word(text) {
            Some(m) => TokenKind::Mnemonic(m),
            None => TokenKind::Tag,
        };
        Token::new(kind, text, line, start)
    }

    /// `:NUMBER:ID.TAG` after the leading module identifier. Restores the
    /// scan position on mismatch so the bare identifier stands alone.
    fn try_comm_tag(&mut self) -> bool {
        let save = self.pos;
        self.advance(); // ':'
        if !self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos = save;
            return false;
        }
        self.eat_digits();
        if self.peek() != Some(':') {
            self.pos = save;
            return false;
        }
        self.advance();
        if !self
            .peek()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        {
            self.pos = save;
            return false;
        }
        self.eat_id();
        if self.peek() != Some('.') {
            self.pos = save;
            return false;
        }
        self.advance();
        if !self
            .peek()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        {
            self.pos = save;
            return false;
        }
        self.eat_id();
        self.eat_tag_continuation();
        true
    }

    /// Rest of the tag shape once the leading identifier is consumed:
    /// dot-joined identifier segments, at most one index per segment, and an
    /// optional terminal `.bit` number that ends the tag.
    fn eat_tag_continuation(&mut self) {
        let mut after_index = false;
        loop {
            match self.peek() {
                Some('[') if !after_index => {
                    if self.try_index() {
                        after_index = true;
                    } else {
                        break;
                    }
                }
                Some('.') => match self.peek_at(1) {
                    Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                        self.advance();
                        self.eat_id();
                        after_index = false;
                    }
                    Some(c) if c.is_ascii_digit() => {
                        self.advance();
                        self.eat_digits();
                        break;
                    }
                    _ => break,
                },
                _ => break,
            }
        }
    }

    /// `[n]` or `[identifier-path]`. Restores position when the bracket is
    /// not an index (it may open a branch instead).
    fn try_index(&mut self) -> bool {
        let save = self.pos;
        self.advance(); // '['
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.eat_digits(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.eat_id();
                while self.peek() == Some('.')
                    && self
                        .peek_at(1)
                        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
                {
                    self.advance();
                    self.eat_id();
                }
            }
            _ => {
                self.pos = save;
                return false;
            }
        }
        if self.peek() == Some(']') {
            self.advance();
            true
        } else {
            self.pos = save;
            false
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a whole rung, returning the tokens and any lexical diagnostics.
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexDiagnostic>) {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token() {
        tokens.push(tok);
    }
    (tokens, lexer.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).0.into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).0.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("()[],;?+-*/"),
            vec![
                TokenKind::LPar,
                TokenKind::RPar,
                TokenKind::LBra,
                TokenKind::RBra,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::UndefVal,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Times,
                TokenKind::Div,
            ]
        );
    }

    #[test]
    fn test_reserved_words_lex_as_mnemonics() {
        // Every reserved mnemonic, isolated, lexes as its mnemonic kind
        for word in [
            "XIC", "XIO", "OTE", "OTU", "OTL", "TON", "TOF", "ONS", "RES", "MOV", "CTU", "EQU",
            "GEQ", "NEQ", "LEQ", "GRT", "COP", "CPT", "ADD", "SUB", "CLR", "LIM", "DIV", "BTD",
            "JSR", "MSG",
        ] {
            let (tokens, diags) = tokenize(word);
            assert!(diags.is_empty());
            assert_eq!(tokens.len(), 1, "{}", word);
            assert_eq!(
                tokens[0].kind,
                TokenKind::Mnemonic(Mnemonic::from_word(word).unwrap()),
                "{}",
                word
            );
        }
    }

    #[test]
    fn test_near_reserved_is_tag() {
        assert_eq!(kinds("XICS"), vec![TokenKind::Tag]);
        assert_eq!(kinds("xic"), vec![TokenKind::Tag]);
        // A dotted path starting with a mnemonic spelling is still a tag
        assert_eq!(kinds("TON.DN"), vec![TokenKind::Tag]);
    }

    #[test]
    fn test_simple_instruction() {
        let (tokens, _) = tokenize("XIC(Start)");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Mnemonic(Mnemonic::Xic),
                TokenKind::LPar,
                TokenKind::Tag,
                TokenKind::RPar,
            ]
        );
        assert_eq!(tokens[2].text, "Start");
    }

    #[test]
    fn test_tag_shapes() {
        assert_eq!(texts("Motor"), vec!["Motor"]);
        assert_eq!(texts("Timer1.DN"), vec!["Timer1.DN"]);
        assert_eq!(texts("Data[5]"), vec!["Data[5]"]);
        assert_eq!(texts("Data[idx]"), vec!["Data[idx]"]);
        assert_eq!(texts("Grp.Arr[Cfg.idx].Val.3"), vec!["Grp.Arr[Cfg.idx].Val.3"]);
        // Terminal bit number ends the tag
        assert_eq!(kinds("Word.12"), vec![TokenKind::Tag]);
    }

    #[test]
    fn test_tag_stops_at_branch_bracket() {
        // The '[' here opens a branch, not an index
        let (tokens, _) = tokenize("OTE(a)[XIC(b)");
        let ks: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            ks,
            vec![
                TokenKind::Mnemonic(Mnemonic::Ote),
                TokenKind::LPar,
                TokenKind::Tag,
                TokenKind::RPar,
                TokenKind::LBra,
                TokenKind::Mnemonic(Mnemonic::Xic),
                TokenKind::LPar,
                TokenKind::Tag,
            ]
        );
    }

    #[test]
    fn test_comm_tag() {
        let (tokens, diags) = tokenize("Local:1:I.Data.3");
        assert!(diags.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::CommTag);
        assert_eq!(tokens[0].text, "Local:1:I.Data.3");
    }

    #[test]
    fn test_comm_tag_mismatch_falls_back() {
        // "Local:" without the slot shape: the identifier stands alone and
        // the colon is an illegal character
        let (tokens, diags) = tokenize("Local:x");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Tag);
        assert_eq!(tokens[0].text, "Local");
        assert_eq!(tokens[1].text, "x");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].ch, ':');
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("42"), vec!["42"]);
        assert_eq!(texts("3.14"), vec!["3.14"]);
        assert_eq!(texts(".5"), vec![".5"]);
        assert_eq!(texts("1e6"), vec!["1e6"]);
        assert_eq!(texts("2.5E-3"), vec!["2.5E-3"]);
        assert_eq!(kinds("42"), vec![TokenKind::Number]);
    }

    #[test]
    fn test_number_without_exponent_digits() {
        // "1e" is a number followed by a tag, as maximal munch dictates
        assert_eq!(
            kinds("1e"),
            vec![TokenKind::Number, TokenKind::Tag]
        );
    }

    #[test]
    fn test_illegal_char_is_skipped() {
        let (tokens, diags) = tokenize("XIC(a)@OTE(b)");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].ch, '@');
        // Lexing continued past the bad character
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_line_tracking() {
        let (tokens, _) = tokenize("XIC(a)\nOTE(b)");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[4].line, 2);
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let (tokens, diags) = tokenize("XIC(Run_Cmd) XIO(Run_Mode) OTL(Run_Mode) ;");
        assert!(diags.is_empty());
        assert_eq!(tokens.len(), 13);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Semicolon);
    }
}
