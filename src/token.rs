use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // Words
    Identifier,
    Keyword,
    Str,
    Number,
    Variable,

    // Operators
    Assign,         // =
    Operator,       // && || | ! == != > >> >>> < << <<< & + - / % -eq -ne ...

    // Structural punctuation
    LeftParen,      // (
    RightParen,     // )
    LeftBracket,    // [
    RightBracket,   // ]
    CurlyOpen,      // {
    CurlyClose,     // }
    Star,           // *
    Comma,          // ,
    Semicolon,      // ;
    Range,          // ..

    // Special
    Eof,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    /// True for a keyword token with the given spelling.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// True for an operator token with the given spelling.
    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == symbol
    }
}
