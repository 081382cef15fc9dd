use crate::token::{Token, TokenKind};
use thiserror::Error;
use tracing::{debug, warn};

const KEYWORDS: &[&str] = &[
    "if", "then", "else", "fi", "for", "while", "do", "done", "echo", "case", "esac", "in",
    "function", "break", "continue",
];

const OPERATORS: &[&str] = &[
    "&&", "||", "|", "!", "==", "!=", ">", ">>", ">>>", "<", "<<", "<<<", "&", "+", "-", "/", "%",
];

const COMPARISON_OPERATORS: &[&str] = &["-eq", "-ne", "-lt", "-gt", "-le", "-ge"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal starting at offset {position}")]
    UnterminatedString { position: usize },
}

/// Scans source text into a flat token sequence terminated by `Eof`.
///
/// The scan is a single left-to-right pass. Unrecognized characters are
/// skipped with a warning; only unterminated string literals are fatal.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_eof() {
            self.skip_whitespace();
            if self.is_eof() {
                break;
            }

            let ch = self.current_char();

            if ch == '#' {
                self.skip_comment();
                continue;
            }

            if self.peek_string(2) == ".." {
                self.push(TokenKind::Range, "..");
                self.position += 2;
                continue;
            }

            if ch == '=' {
                if self.peek() == Some('=') {
                    self.push(TokenKind::Operator, "==");
                    self.position += 2;
                } else {
                    self.push(TokenKind::Assign, "=");
                    self.position += 1;
                }
                continue;
            }

            if let Some(kind) = punctuation_kind(ch) {
                self.push(kind, ch.to_string());
                self.position += 1;
                continue;
            }

            if ch.is_ascii_digit() {
                self.read_number();
                continue;
            }

            // Longest operator match first: three chars, then two, then one.
            let three = self.peek_string(3);
            if is_comparison_operator(&three) || is_operator(&three) {
                self.push(TokenKind::Operator, three);
                self.position += 3;
                continue;
            }
            // `-a`, `-rf`: a dash starting a word is a command flag, not
            // the subtraction operator. Checked after the three-char window
            // so `-gt` and friends still win.
            if ch == '-' && self.peek().is_some_and(|c| c.is_alphabetic()) {
                self.read_identifier_or_keyword();
                continue;
            }

            let two = self.peek_string(2);
            if is_operator(&two) {
                self.push(TokenKind::Operator, two);
                self.position += 2;
                continue;
            }
            let one = ch.to_string();
            if is_operator(&one) {
                self.push(TokenKind::Operator, one);
                self.position += 1;
                continue;
            }

            if ch == '$' {
                self.read_variable();
                continue;
            }

            if ch.is_alphabetic() {
                self.read_identifier_or_keyword();
                continue;
            }

            if ch == '"' || ch == '\'' {
                self.read_string(ch)?;
                continue;
            }

            warn!(character = %ch, position = self.position, "skipping unrecognized character");
            self.position += 1;
        }

        self.tokens.push(Token::eof());
        debug!(count = self.tokens.len(), "tokenization complete");
        Ok(self.tokens)
    }

    fn read_number(&mut self) {
        let start = self.position;
        while !self.is_eof() && self.current_char().is_ascii_digit() {
            self.position += 1;
        }
        let text: String = self.input[start..self.position].iter().collect();
        self.push(TokenKind::Number, text);

        // Range sugar: `1..5` lexes as NUMBER RANGE NUMBER, so `{1..5}`
        // needs no dedicated grammar rule.
        if self.peek_string(2) == ".." {
            self.push(TokenKind::Range, "..");
            self.position += 2;
            if !self.is_eof() && self.current_char().is_ascii_digit() {
                self.read_number();
            }
        }
    }

    fn read_variable(&mut self) {
        let start = self.position;
        self.position += 1; // sigil
        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' {
                self.position += 1;
            } else {
                break;
            }
        }
        let text: String = self.input[start..self.position].iter().collect();
        self.push(TokenKind::Variable, text);
    }

    fn read_identifier_or_keyword(&mut self) {
        let start = self.position;
        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '-' {
                self.position += 1;
            } else {
                break;
            }
        }
        let word: String = self.input[start..self.position].iter().collect();
        let kind = if KEYWORDS.contains(&word.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, word);
    }

    fn read_string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.position;
        self.position += 1; // opening quote
        let mut value = String::new();

        while !self.is_eof() && self.current_char() != quote {
            if self.current_char() == '\\' && self.position + 1 < self.input.len() {
                // Backslash escapes copy both characters through verbatim.
                value.push(self.current_char());
                value.push(self.input[self.position + 1]);
                self.position += 2;
            } else {
                value.push(self.current_char());
                self.position += 1;
            }
        }

        if self.is_eof() {
            return Err(LexError::UnterminatedString { position: start });
        }

        self.position += 1; // closing quote
        self.push(TokenKind::Str, value);
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.position += 1;
        }
    }

    fn skip_comment(&mut self) {
        while !self.is_eof() && self.current_char() != '\n' {
            self.position += 1;
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.tokens.push(Token::new(kind, text));
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn peek_string(&self, len: usize) -> String {
        let end = (self.position + len).min(self.input.len());
        self.input[self.position..end].iter().collect()
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }
}

fn punctuation_kind(ch: char) -> Option<TokenKind> {
    match ch {
        '{' => Some(TokenKind::CurlyOpen),
        '}' => Some(TokenKind::CurlyClose),
        '*' => Some(TokenKind::Star),
        ',' => Some(TokenKind::Comma),
        '[' => Some(TokenKind::LeftBracket),
        ']' => Some(TokenKind::RightBracket),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        ';' => Some(TokenKind::Semicolon),
        _ => None,
    }
}

fn is_operator(symbol: &str) -> bool {
    OPERATORS.contains(&symbol)
}

fn is_comparison_operator(symbol: &str) -> bool {
    COMPARISON_OPERATORS.contains(&symbol)
}
