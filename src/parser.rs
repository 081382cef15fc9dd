use crate::ast::{CaseArm, LogicalOp, Node, has_variable_reference, interpolate};
use crate::token::{Token, TokenKind};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Sigiled loop-condition form: `$i -le 10`.
static SIGILED_CONDITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)\s+-[a-z]+\s+").expect("constant regex pattern is valid"));

/// Bare loop-condition form: `i < 10`.
static BARE_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*(?:[<>]=?|==|!=)\s*").expect("constant regex pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found:?} at token {position}")]
    Expected {
        expected: String,
        found: Token,
        position: usize,
    },

    #[error("unexpected token {found:?} at token {position}")]
    Unexpected { found: Token, position: usize },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("missing filename after redirection operator '>' at token {position}")]
    MissingRedirectTarget { position: usize },

    #[error("range bounds must be numbers at token {position}")]
    MalformedRange { position: usize },
}

/// Best-effort extraction of the variable a while-loop condition iterates on.
///
/// The sigiled form (`$i -le 10`) is tried before the bare-identifier form
/// (`i < 10`); returns `None` when neither pattern matches. The caller uses
/// the result to append an implicit increment when the loop body never
/// assigns to the variable.
pub fn loop_variable(condition: &str) -> Option<String> {
    if let Some(caps) = SIGILED_CONDITION.captures(condition) {
        return Some(caps[1].to_string());
    }
    BARE_CONDITION
        .captures(condition)
        .map(|caps| caps[1].to_string())
}

/// Recursive-descent parser over the token sequence.
///
/// A single cursor is shared by all rules; every rule either advances it or
/// returns a `SyntaxError`, so parsing terminates on all inputs. The first
/// error aborts the parse.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::eof());
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut program = Vec::new();
        self.skip_semicolons();
        while !self.at_end() {
            program.push(self.parse_statement()?);
            self.skip_semicolons();
        }
        debug!(statements = program.len(), "parse complete");
        Ok(program)
    }

    fn parse_statement(&mut self) -> Result<Node, SyntaxError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier => {
                if token.text == "return" {
                    self.parse_return()
                } else if token.text == "exit" {
                    self.parse_exit()
                } else if self.at_function_definition() {
                    self.parse_function_definition()
                } else if self.lookahead_kind(1) == Some(TokenKind::LeftParen) {
                    self.parse_function_call()
                } else if self.lookahead_kind(1) == Some(TokenKind::Assign) {
                    self.parse_assignment()
                } else {
                    self.parse_command()
                }
            }
            TokenKind::Variable => self.parse_assignment(),
            TokenKind::Keyword => self.parse_keyword(),
            TokenKind::LeftBracket => self.parse_bracket_condition(),
            TokenKind::LeftParen => self.parse_subshell(),
            _ => Err(SyntaxError::Unexpected {
                found: token,
                position: self.position,
            }),
        }
    }

    fn parse_keyword(&mut self) -> Result<Node, SyntaxError> {
        let position = self.position;
        let token = self.advance();
        match token.text.as_str() {
            "if" => self.parse_if(),
            "while" => self.parse_while(),
            "for" => self.parse_for(),
            "case" => self.parse_case(),
            "echo" => self.parse_echo(),
            "function" => self.parse_function_keyword(),
            "break" => Ok(Node::Break),
            "continue" => Ok(Node::Continue),
            // Block closers are consumed by their enclosing rules; reaching
            // one here means it has no construct to close.
            _ => Err(SyntaxError::Unexpected {
                found: token,
                position,
            }),
        }
    }

    fn parse_if(&mut self) -> Result<Node, SyntaxError> {
        self.expect(TokenKind::LeftBracket, "'[' opening the if condition")?;
        let (condition, _) = self.parse_condition()?;
        self.expect(TokenKind::RightBracket, "']' closing the if condition")?;
        self.consume_semicolon();
        self.expect_keyword("then")?;

        let mut then_body = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check_keyword("fi") || self.check_keyword("else") {
                break;
            }
            if self.at_end() {
                return Err(SyntaxError::UnexpectedEof {
                    expected: "'fi' closing the if statement".into(),
                });
            }
            then_body.push(self.parse_statement()?);
        }

        let else_body = if self.check_keyword("else") {
            self.advance();
            let mut body = Vec::new();
            loop {
                self.skip_semicolons();
                if self.check_keyword("fi") {
                    break;
                }
                if self.at_end() {
                    return Err(SyntaxError::UnexpectedEof {
                        expected: "'fi' closing the if statement".into(),
                    });
                }
                body.push(self.parse_statement()?);
            }
            Some(body)
        } else {
            None
        };

        self.advance(); // fi
        Ok(Node::If {
            condition: Box::new(condition),
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> Result<Node, SyntaxError> {
        self.expect(TokenKind::LeftBracket, "'[' opening the while condition")?;
        let (condition, raw_condition) = self.parse_condition()?;
        self.expect(TokenKind::RightBracket, "']' closing the while condition")?;
        self.consume_semicolon();
        self.expect_keyword("do")?;

        let mut body = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check_keyword("done") {
                break;
            }
            if self.at_end() {
                return Err(SyntaxError::UnexpectedEof {
                    expected: "'done' closing the while loop".into(),
                });
            }
            body.push(self.parse_statement()?);
        }
        self.advance(); // done

        // Shell increments like `(( i++ ))` are not modeled, so a loop whose
        // condition variable is never assigned gets an implicit increment.
        if let Some(variable) = loop_variable(&raw_condition) {
            if !body.iter().any(|stmt| stmt.assigns_to(&variable)) {
                debug!(variable = %variable, "appending implicit loop increment");
                body.push(Node::Increment { name: variable });
            }
        }

        Ok(Node::While {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_for(&mut self) -> Result<Node, SyntaxError> {
        let variable = self.expect(TokenKind::Identifier, "for-loop variable")?.text;
        self.expect_keyword("in")?;

        let iterable = if self.check(TokenKind::CurlyOpen) {
            self.advance();
            let start = self.parse_range_bound()?;
            self.expect(TokenKind::Range, "'..' inside range expression")?;
            let end = self.parse_range_bound()?;
            self.expect(TokenKind::CurlyClose, "'}' at end of range expression")?;
            Node::RangeExpr { start, end }
        } else {
            let mut items = Vec::new();
            loop {
                let token = self.current().clone();
                match token.kind {
                    TokenKind::Number => {
                        self.advance();
                        items.push(Node::Num(token.text));
                    }
                    TokenKind::Str => {
                        self.advance();
                        items.push(Node::Str(token.text));
                    }
                    // Non-numeric bare words become quoted strings.
                    TokenKind::Identifier => {
                        self.advance();
                        items.push(Node::Str(token.text));
                    }
                    _ => break,
                }
            }
            if items.is_empty() {
                return Err(self.error_expected("for-loop iterable"));
            }
            Node::List(items)
        };

        self.consume_semicolon();
        self.expect_keyword("do")?;

        let mut body = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check_keyword("done") {
                break;
            }
            if self.at_end() {
                return Err(SyntaxError::UnexpectedEof {
                    expected: "'done' closing the for loop".into(),
                });
            }
            body.push(self.parse_statement()?);
        }
        self.advance(); // done

        Ok(Node::For {
            variable,
            iterable: Box::new(iterable),
            body,
        })
    }

    fn parse_range_bound(&mut self) -> Result<i64, SyntaxError> {
        let position = self.position;
        let token = self.expect(TokenKind::Number, "number in range expression")?;
        token
            .text
            .parse::<i64>()
            .map_err(|_| SyntaxError::MalformedRange { position })
    }

    fn parse_case(&mut self) -> Result<Node, SyntaxError> {
        let token = self.current().clone();
        let scrutinee = match token.kind {
            TokenKind::Variable | TokenKind::Identifier => {
                self.advance();
                token.text
            }
            _ => return Err(self.error_expected("variable after 'case'")),
        };
        self.expect_keyword("in")?;

        let mut arms = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check_keyword("esac") {
                break;
            }
            if self.at_end() {
                return Err(SyntaxError::UnexpectedEof {
                    expected: "'esac' closing the case statement".into(),
                });
            }

            let label_token = self.current().clone();
            let label = match label_token.kind {
                TokenKind::Str => {
                    self.advance();
                    Node::Str(label_token.text)
                }
                TokenKind::Number => {
                    self.advance();
                    Node::Num(label_token.text)
                }
                _ => return Err(self.error_expected("string or number case label")),
            };
            self.expect(TokenKind::RightParen, "')' after case label")?;

            let mut body = Vec::new();
            loop {
                self.skip_semicolons();
                if self.check_keyword("esac") || self.at_end() || self.at_case_label() {
                    break;
                }
                body.push(self.parse_statement()?);
            }
            arms.push(CaseArm { label, body });
        }

        self.expect_keyword("esac")?;
        Ok(Node::Case { scrutinee, arms })
    }

    fn at_case_label(&self) -> bool {
        matches!(self.current().kind, TokenKind::Str | TokenKind::Number)
            && self.lookahead_kind(1) == Some(TokenKind::RightParen)
    }

    fn parse_echo(&mut self) -> Result<Node, SyntaxError> {
        let mut parts: Vec<String> = Vec::new();
        let mut raw: Vec<String> = Vec::new();
        let mut interpolated = false;
        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Keyword
                | TokenKind::CurlyClose
                | TokenKind::RightParen
                | TokenKind::Semicolon
                | TokenKind::Operator
                | TokenKind::Eof => break,
                // `return` / `exit` start a new statement, same as in
                // statement dispatch.
                TokenKind::Identifier if token.text == "return" || token.text == "exit" => {
                    break;
                }
                TokenKind::Str | TokenKind::Identifier | TokenKind::Number => {
                    self.advance();
                    raw.push(token.text.clone());
                    parts.push(token.text);
                }
                TokenKind::Variable => {
                    self.advance();
                    interpolated = true;
                    raw.push(token.text.clone());
                    parts.push(format!("{{{}}}", token.text.trim_start_matches('$')));
                }
                // Best effort: anything echo cannot carry is dropped.
                _ => {
                    self.advance();
                }
            }
        }

        let mut joined = parts.join(" ");
        // Variables embedded in string literals interpolate the same way
        // bare `$name` arguments do.
        if has_variable_reference(&joined) {
            joined = interpolate(&joined);
            interpolated = true;
        }

        let value = if joined.is_empty() {
            None
        } else if interpolated {
            Some(Box::new(Node::Interp(joined)))
        } else {
            Some(Box::new(Node::Str(joined)))
        };

        // On the left of `|` an echo behaves like any other command, so
        // the raw arguments feed the pipeline rule instead.
        if self.check_operator("|") {
            let echo = Node::Command {
                program: "echo".into(),
                args: raw,
            };
            return self.parse_command_trailers(echo);
        }

        if self.check_operator(">") {
            self.advance();
            let file = self.redirect_target()?;
            return Ok(Node::Redirect {
                file,
                content: value,
            });
        }
        Ok(Node::Echo { value })
    }

    fn parse_command(&mut self) -> Result<Node, SyntaxError> {
        let node = self.parse_bare_command()?;
        self.parse_command_trailers(node)
    }

    /// `> file` and `| cmd` trailers fold onto `node` left to right.
    fn parse_command_trailers(&mut self, mut node: Node) -> Result<Node, SyntaxError> {
        loop {
            if self.check_operator(">") {
                self.advance();
                let file = self.redirect_target()?;
                node = Node::Redirect {
                    file,
                    content: Some(Box::new(node)),
                };
            } else if self.check_operator("|") {
                self.advance();
                let right = self.parse_bare_command()?;
                node = Node::Pipeline {
                    left: Box::new(node),
                    right: Box::new(right),
                };
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_bare_command(&mut self) -> Result<Node, SyntaxError> {
        let program = self.expect(TokenKind::Identifier, "command name")?.text;
        let mut args = Vec::new();
        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Keyword
                | TokenKind::Semicolon
                | TokenKind::CurlyClose
                | TokenKind::RightParen
                | TokenKind::Eof => break,
                TokenKind::Operator if token.text == ">" || token.text == "|" => break,
                // `return` / `exit` start a new statement, same as in
                // statement dispatch.
                TokenKind::Identifier if token.text == "return" || token.text == "exit" => {
                    break;
                }
                // A following assignment starts a new statement.
                TokenKind::Identifier
                    if self.lookahead_kind(1) == Some(TokenKind::Assign) =>
                {
                    break;
                }
                _ => {
                    self.advance();
                    args.push(token.text);
                }
            }
        }
        Ok(Node::Command { program, args })
    }

    fn redirect_target(&mut self) -> Result<String, SyntaxError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier | TokenKind::Str => {
                self.advance();
                Ok(token.text)
            }
            _ => Err(SyntaxError::MissingRedirectTarget {
                position: self.position,
            }),
        }
    }

    fn parse_assignment(&mut self) -> Result<Node, SyntaxError> {
        // Dispatch guarantees an identifier or variable target; `$x=` forms
        // are treated as plain assignment targets.
        let name = self.advance().text.trim_start_matches('$').to_string();
        self.expect(TokenKind::Assign, "'=' in assignment")?;
        let value = self.parse_assignment_value()?;
        Ok(Node::Assign {
            name,
            value: value.map(Box::new),
        })
    }

    fn parse_assignment_value(&mut self) -> Result<Option<Node>, SyntaxError> {
        if self.at_arithmetic_substitution() {
            return Ok(Some(self.parse_arithmetic()?));
        }
        let token = self.current().clone();
        // `$(cmd)` command substitution is not modeled; a bare sigil on the
        // right of `=` can only open `$((`.
        if token.kind == TokenKind::Variable && token.text == "$" {
            return Err(self.error_expected("'((' opening arithmetic substitution"));
        }
        let node = match token.kind {
            TokenKind::Number => Node::Num(token.text),
            TokenKind::Str => Node::Str(token.text),
            // The start of a following assignment is not this one's value.
            TokenKind::Identifier if self.lookahead_kind(1) == Some(TokenKind::Assign) => {
                return Ok(None);
            }
            // Non-numeric bare words become quoted strings.
            TokenKind::Identifier => Node::Str(token.text),
            TokenKind::Variable => Node::Word(token.text.trim_start_matches('$').to_string()),
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(node))
    }

    fn at_arithmetic_substitution(&self) -> bool {
        self.current().kind == TokenKind::Variable
            && self.current().text == "$"
            && self.lookahead_kind(1) == Some(TokenKind::LeftParen)
            && self.lookahead_kind(2) == Some(TokenKind::LeftParen)
    }

    /// `$((expr))`: tokens are copied through verbatim with variables
    /// de-sigiled, tracking parenthesis depth from 2 down to 0.
    fn parse_arithmetic(&mut self) -> Result<Node, SyntaxError> {
        self.advance(); // $
        self.expect(TokenKind::LeftParen, "'((' opening arithmetic substitution")?;
        self.expect(TokenKind::LeftParen, "'((' opening arithmetic substitution")?;

        let mut depth = 2usize;
        let mut parts: Vec<String> = Vec::new();
        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Eof => {
                    return Err(SyntaxError::UnexpectedEof {
                        expected: "'))' closing arithmetic substitution".into(),
                    });
                }
                TokenKind::LeftParen => {
                    self.advance();
                    depth += 1;
                    parts.push("(".into());
                }
                TokenKind::RightParen => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    // Only parens nested above the two delimiters are content.
                    if depth >= 2 {
                        parts.push(")".into());
                    }
                }
                TokenKind::Variable => {
                    self.advance();
                    parts.push(token.text.trim_start_matches('$').to_string());
                }
                _ => {
                    self.advance();
                    parts.push(token.text);
                }
            }
        }
        Ok(Node::Arith(parts.join(" ")))
    }

    /// Condition between `[` and `]`, as a comparison/logical tree.
    fn parse_condition(&mut self) -> Result<(Node, String), SyntaxError> {
        let start = self.position;
        let mut node = self.parse_comparison()?;
        loop {
            let op = if self.check_operator("&&") {
                LogicalOp::And
            } else if self.check_operator("||") {
                LogicalOp::Or
            } else {
                break;
            };
            self.advance();
            let right = self.parse_comparison()?;
            node = Node::Logical {
                op,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        if !self.check(TokenKind::RightBracket) {
            return Err(self.error_expected("']' closing the condition"));
        }
        let raw = self.tokens[start..self.position]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Ok((node, raw))
    }

    fn parse_comparison(&mut self) -> Result<Node, SyntaxError> {
        let left = self.parse_condition_operand()?;
        if self.check(TokenKind::Operator)
            && !self.check_operator("&&")
            && !self.check_operator("||")
        {
            let op = self.advance().text;
            let right = self.parse_condition_operand()?;
            return Ok(Node::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_condition_operand(&mut self) -> Result<Node, SyntaxError> {
        let token = self.current().clone();
        let node = match token.kind {
            TokenKind::Variable => Node::Variable(token.text),
            TokenKind::Identifier => Node::Word(token.text),
            TokenKind::Number => Node::Num(token.text),
            TokenKind::Str => Node::Str(token.text),
            _ => return Err(self.error_expected("condition operand")),
        };
        self.advance();
        Ok(node)
    }

    /// A bracket condition without an enclosing keyword becomes an
    /// expression statement.
    fn parse_bracket_condition(&mut self) -> Result<Node, SyntaxError> {
        self.advance(); // [
        let (condition, _) = self.parse_condition()?;
        self.expect(TokenKind::RightBracket, "']' closing the condition")?;
        self.consume_semicolon();
        Ok(condition)
    }

    fn parse_subshell(&mut self) -> Result<Node, SyntaxError> {
        self.advance(); // (
        let command = self.parse_bare_command()?;
        self.expect(TokenKind::RightParen, "')' closing the subshell")?;
        Ok(Node::Subshell {
            command: Box::new(command),
        })
    }

    fn parse_function_definition(&mut self) -> Result<Node, SyntaxError> {
        let name = self.advance().text; // identifier, guarded by dispatch
        self.expect(TokenKind::LeftParen, "'()' after function name")?;
        self.expect(TokenKind::RightParen, "'()' after function name")?;
        self.parse_function_body(name)
    }

    /// `function name() { ... }` prefix form.
    fn parse_function_keyword(&mut self) -> Result<Node, SyntaxError> {
        let name = self.expect(TokenKind::Identifier, "function name")?.text;
        if self.check(TokenKind::LeftParen) {
            self.advance();
            self.expect(TokenKind::RightParen, "')' after function name")?;
        }
        self.parse_function_body(name)
    }

    fn parse_function_body(&mut self, name: String) -> Result<Node, SyntaxError> {
        self.expect(TokenKind::CurlyOpen, "'{' opening the function body")?;
        let mut body = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check(TokenKind::CurlyClose) {
                break;
            }
            if self.at_end() {
                return Err(SyntaxError::UnexpectedEof {
                    expected: "'}' closing the function body".into(),
                });
            }
            body.push(self.parse_statement()?);
        }
        self.advance(); // }
        Ok(Node::FunctionDef {
            name,
            params: Vec::new(),
            body,
        })
    }

    fn parse_function_call(&mut self) -> Result<Node, SyntaxError> {
        let name = self.advance().text;
        self.expect(TokenKind::LeftParen, "'(' opening the argument list")?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RightParen) {
            let token = self.current().clone();
            let arg = match token.kind {
                TokenKind::Identifier => Node::Word(token.text),
                TokenKind::Variable => Node::Word(token.text.trim_start_matches('$').to_string()),
                TokenKind::Str => Node::Str(token.text),
                TokenKind::Number => Node::Num(token.text),
                _ => return Err(self.error_expected("function call argument")),
            };
            self.advance();
            args.push(arg);
            if self.check(TokenKind::Comma) {
                self.advance();
            }
        }
        self.advance(); // )
        Ok(Node::FunctionCall { name, args })
    }

    fn parse_return(&mut self) -> Result<Node, SyntaxError> {
        self.advance(); // return
        Ok(Node::Return {
            value: self.parse_bare_value().map(Box::new),
        })
    }

    fn parse_exit(&mut self) -> Result<Node, SyntaxError> {
        self.advance(); // exit
        Ok(Node::Exit {
            code: self.parse_bare_value().map(Box::new),
        })
    }

    /// Optional bare value after `return` / `exit`: a number, identifier,
    /// or de-sigiled variable.
    fn parse_bare_value(&mut self) -> Option<Node> {
        let token = self.current().clone();
        let node = match token.kind {
            TokenKind::Number => Node::Num(token.text),
            TokenKind::Identifier => Node::Word(token.text),
            TokenKind::Variable => Node::Word(token.text.trim_start_matches('$').to_string()),
            _ => return None,
        };
        self.advance();
        Some(node)
    }

    fn at_function_definition(&self) -> bool {
        self.lookahead_kind(1) == Some(TokenKind::LeftParen)
            && self.lookahead_kind(2) == Some(TokenKind::RightParen)
            && self.lookahead_kind(3) == Some(TokenKind::CurlyOpen)
    }

    fn error_expected(&self, expected: &str) -> SyntaxError {
        let found = self.current().clone();
        if found.kind == TokenKind::Eof {
            SyntaxError::UnexpectedEof {
                expected: expected.into(),
            }
        } else {
            SyntaxError::Expected {
                expected: expected.into(),
                found,
                position: self.position,
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.current().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), SyntaxError> {
        if self.check_keyword(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(&format!("'{word}'")))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.current().is_keyword(word)
    }

    fn check_operator(&self, symbol: &str) -> bool {
        self.current().is_operator(symbol)
    }

    fn skip_semicolons(&mut self) {
        while self.check(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn consume_semicolon(&mut self) {
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn lookahead_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.position + offset).map(|t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }
}
