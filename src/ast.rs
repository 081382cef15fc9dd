use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `$name` references inside already-collected text.
static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("constant regex pattern is valid"));

/// Rewrite `$name` references to `{name}` placeholders for f-string emission.
pub fn interpolate(text: &str) -> String {
    VAR_PATTERN.replace_all(text, "{${1}}").into_owned()
}

/// True when `text` contains a `$name` variable reference.
pub fn has_variable_reference(text: &str) -> bool {
    VAR_PATTERN.is_match(text)
}

/// Syntax tree for the shell dialect.
///
/// Nodes are built bottom-up by the parser and consumed once by the code
/// generator. Statement variants map one-to-one onto emission templates;
/// the leaf variants at the bottom carry expression values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    If {
        condition: Box<Node>,
        then_body: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    For {
        variable: String,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    Case {
        scrutinee: String,
        arms: Vec<CaseArm>,
    },
    Assign {
        name: String,
        value: Option<Box<Node>>,
    },
    /// `name += 1`, appended to a while loop whose condition variable is
    /// never assigned in the body.
    Increment {
        name: String,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    Echo {
        value: Option<Box<Node>>,
    },
    /// An external command run through the subprocess module.
    Command {
        program: String,
        args: Vec<String>,
    },
    /// `cmd > file`, or `echo ... > file` with the echo value as content.
    Redirect {
        file: String,
        content: Option<Box<Node>>,
    },
    Pipeline {
        left: Box<Node>,
        right: Box<Node>,
    },
    Subshell {
        command: Box<Node>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A comparison with the operator kept in source spelling (`-gt`, `==`);
    /// translation happens at generation.
    Comparison {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    Exit {
        code: Option<Box<Node>>,
    },
    Break,
    Continue,

    // Expression leaves
    Str(String),
    /// String contents containing `{name}` placeholders, emitted as an
    /// f-string.
    Interp(String),
    Num(String),
    Word(String),
    Variable(String),
    /// Arithmetic substitution body, already rendered to target syntax.
    Arith(String),
    /// `{start..end}` brace range, inclusive on both ends in the source.
    RangeExpr {
        start: i64,
        end: i64,
    },
    List(Vec<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseArm {
    pub label: Node,
    pub body: Vec<Node>,
}

impl Node {
    /// True when this statement assigns to `name`, looking through nested
    /// bodies. Used by the while-loop increment heuristic.
    pub fn assigns_to(&self, name: &str) -> bool {
        let mut found = false;
        self.walk(&mut |node| match node {
            Node::Assign { name: n, .. } | Node::Increment { name: n } if n == name => {
                found = true;
            }
            _ => {}
        });
        found
    }

    /// Visit this node and every owned sub-tree, depth first.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        match self {
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                condition.walk(f);
                for stmt in then_body {
                    stmt.walk(f);
                }
                for stmt in else_body.iter().flatten() {
                    stmt.walk(f);
                }
            }
            Node::While { condition, body } => {
                condition.walk(f);
                for stmt in body {
                    stmt.walk(f);
                }
            }
            Node::For { iterable, body, .. } => {
                iterable.walk(f);
                for stmt in body {
                    stmt.walk(f);
                }
            }
            Node::Case { arms, .. } => {
                for arm in arms {
                    arm.label.walk(f);
                    for stmt in &arm.body {
                        stmt.walk(f);
                    }
                }
            }
            Node::FunctionDef { body, .. } => {
                for stmt in body {
                    stmt.walk(f);
                }
            }
            Node::FunctionCall { args, .. } => {
                for arg in args {
                    arg.walk(f);
                }
            }
            Node::Assign { value, .. } | Node::Echo { value } | Node::Return { value } => {
                if let Some(inner) = value {
                    inner.walk(f);
                }
            }
            Node::Exit { code } => {
                if let Some(inner) = code {
                    inner.walk(f);
                }
            }
            Node::Redirect { content, .. } => {
                if let Some(inner) = content {
                    inner.walk(f);
                }
            }
            Node::Pipeline { left, right }
            | Node::Logical { left, right, .. }
            | Node::Comparison { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            Node::Subshell { command } => command.walk(f),
            Node::List(items) => {
                for item in items {
                    item.walk(f);
                }
            }
            Node::Increment { .. }
            | Node::Command { .. }
            | Node::Break
            | Node::Continue
            | Node::Str(_)
            | Node::Interp(_)
            | Node::Num(_)
            | Node::Word(_)
            | Node::Variable(_)
            | Node::Arith(_)
            | Node::RangeExpr { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate() {
        assert_eq!(interpolate("count: $i"), "count: {i}");
        assert_eq!(interpolate("$a and $b"), "{a} and {b}");
        assert_eq!(interpolate("no variables"), "no variables");
    }

    #[test]
    fn test_assigns_to_sees_nested_bodies() {
        let node = Node::If {
            condition: Box::new(Node::Word("x".into())),
            then_body: vec![Node::Assign {
                name: "i".into(),
                value: Some(Box::new(Node::Num("0".into()))),
            }],
            else_body: None,
        };
        assert!(node.assigns_to("i"));
        assert!(!node.assigns_to("j"));
    }

    #[test]
    fn test_assigns_to_counts_increments() {
        let node = Node::Increment { name: "i".into() };
        assert!(node.assigns_to("i"));
    }
}
