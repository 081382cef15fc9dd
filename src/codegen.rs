use crate::ast::{LogicalOp, Node, has_variable_reference, interpolate};
use thiserror::Error;
use tracing::debug;

const INDENT: &str = "    ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("cannot emit {construct} as a {context}")]
    UnsupportedConstruct {
        construct: &'static str,
        context: &'static str,
    },
}

/// Emits Python source from a parsed program.
///
/// Every statement template indents its children one level deeper than
/// itself, so nesting depth in the output always mirrors the tree.
#[derive(Default)]
pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, program: &[Node]) -> Result<String, CodegenError> {
        let mut output = String::new();
        for line in self.import_header(program) {
            output.push_str(line);
            output.push('\n');
        }
        if !output.is_empty() {
            output.push('\n');
        }

        let mut statements = Vec::with_capacity(program.len());
        for node in program {
            statements.push(self.statement(node, 0)?);
        }
        output.push_str(&statements.join("\n"));
        debug!(lines = output.lines().count(), "generation complete");
        Ok(output)
    }

    /// Imports are collected up front so they appear once, at the top,
    /// regardless of where in the tree they are needed.
    fn import_header(&self, program: &[Node]) -> Vec<&'static str> {
        let mut uses_subprocess = false;
        let mut uses_sys = false;
        for node in program {
            node.walk(&mut |n| match n {
                Node::Command { .. } | Node::Pipeline { .. } | Node::Subshell { .. } => {
                    uses_subprocess = true;
                }
                Node::Exit { .. } => uses_sys = true,
                _ => {}
            });
        }

        let mut imports = Vec::new();
        if uses_subprocess {
            imports.push("import subprocess");
        }
        if uses_sys {
            imports.push("import sys");
        }
        imports
    }

    fn statement(&self, node: &Node, indent: usize) -> Result<String, CodegenError> {
        let pad = INDENT.repeat(indent);
        match node {
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                let mut out = format!("{pad}if {}:\n", self.expression(condition)?);
                out.push_str(&self.block(then_body, indent + 1)?);
                if let Some(body) = else_body {
                    out.push_str(&format!("\n{pad}else:\n"));
                    out.push_str(&self.block(body, indent + 1)?);
                }
                Ok(out)
            }
            Node::While { condition, body } => {
                let mut out = format!("{pad}while {}:\n", self.expression(condition)?);
                out.push_str(&self.block(body, indent + 1)?);
                Ok(out)
            }
            Node::For {
                variable,
                iterable,
                body,
            } => {
                let iter = match iterable.as_ref() {
                    // Shell ranges are inclusive on both ends.
                    Node::RangeExpr { start, end } => {
                        format!("range({start}, {})", end.saturating_add(1))
                    }
                    other => self.expression(other)?,
                };
                let mut out = format!("{pad}for {variable} in {iter}:\n");
                out.push_str(&self.block(body, indent + 1)?);
                Ok(out)
            }
            Node::Case { scrutinee, arms } => {
                let subject = scrutinee.trim_start_matches('$');
                let mut out = format!("{pad}match {subject}:");
                let arm_pad = INDENT.repeat(indent + 1);
                for arm in arms {
                    out.push_str(&format!(
                        "\n{arm_pad}case {}:\n",
                        self.expression(&arm.label)?
                    ));
                    out.push_str(&self.block(&arm.body, indent + 2)?);
                }
                Ok(out)
            }
            Node::Assign { name, value } => {
                let rhs = match value {
                    Some(node) => self.expression(node)?,
                    None => "None".to_string(),
                };
                Ok(format!("{pad}{name} = {rhs}"))
            }
            Node::Increment { name } => Ok(format!("{pad}{name} += 1")),
            Node::FunctionDef { name, params, body } => {
                let mut out = format!("{pad}def {name}({}):\n", params.join(", "));
                out.push_str(&self.block(body, indent + 1)?);
                Ok(out)
            }
            Node::FunctionCall { name, args } => {
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    rendered.push(self.expression(arg)?);
                }
                Ok(format!("{pad}{name}({})", rendered.join(", ")))
            }
            Node::Echo { value } => {
                let text = match value {
                    Some(node) => self.expression(node)?,
                    None => "''".to_string(),
                };
                Ok(format!("{pad}print({text})"))
            }
            Node::Command { .. } => {
                let text = self.command_text(node)?;
                if has_variable_reference(&text) {
                    let formatted = interpolate(&text);
                    Ok(format!(
                        "{pad}subprocess.run(f\"{formatted}\", shell=True)"
                    ))
                } else {
                    Ok(format!("{pad}subprocess.run(\"{text}\", shell=True)"))
                }
            }
            Node::Redirect { file, content } => {
                let mut out = format!("{pad}with open('{file}', 'w') as f:\n");
                let inner_pad = INDENT.repeat(indent + 1);
                let written = match content.as_deref() {
                    Some(command @ Node::Command { .. }) => format!(
                        "subprocess.check_output('{}', shell=True).decode('utf-8')",
                        self.command_text(command)?
                    ),
                    Some(other) => format!("str({})", self.expression(other)?),
                    None => "str('')".to_string(),
                };
                out.push_str(&format!("{inner_pad}f.write({written})"));
                Ok(out)
            }
            Node::Pipeline { left, right } => {
                let producer = self.command_text(left)?;
                let consumer = self.command_text(right)?;
                Ok(format!(
                    "{pad}p1 = subprocess.Popen('{producer}', shell=True, stdout=subprocess.PIPE)\n\
                     {pad}p2 = subprocess.Popen('{consumer}', shell=True, stdin=p1.stdout, stdout=subprocess.PIPE)\n\
                     {pad}p1.stdout.close()\n\
                     {pad}output, _ = p2.communicate()"
                ))
            }
            Node::Subshell { command } => Ok(format!(
                "{pad}output = subprocess.check_output('{}', shell=True).decode()",
                self.command_text(command)?
            )),
            Node::Return { value } => match value {
                Some(node) => Ok(format!("{pad}return {}", self.expression(node)?)),
                None => Ok(format!("{pad}return")),
            },
            Node::Exit { code } => {
                let code = match code {
                    Some(node) => self.expression(node)?,
                    None => "0".to_string(),
                };
                Ok(format!("{pad}sys.exit({code})"))
            }
            Node::Break => Ok(format!("{pad}break")),
            Node::Continue => Ok(format!("{pad}continue")),
            // A bare bracket condition becomes an expression statement.
            Node::Comparison { .. } | Node::Logical { .. } => {
                Ok(format!("{pad}{}", self.expression(node)?))
            }
            other => Err(CodegenError::UnsupportedConstruct {
                construct: kind_name(other),
                context: "statement",
            }),
        }
    }

    fn block(&self, body: &[Node], indent: usize) -> Result<String, CodegenError> {
        if body.is_empty() {
            return Ok(format!("{}pass", INDENT.repeat(indent)));
        }
        let mut lines = Vec::with_capacity(body.len());
        for node in body {
            lines.push(self.statement(node, indent)?);
        }
        Ok(lines.join("\n"))
    }

    fn expression(&self, node: &Node) -> Result<String, CodegenError> {
        match node {
            Node::Str(text) => Ok(format!("\"{text}\"")),
            Node::Interp(text) => Ok(format!("f\"{text}\"")),
            Node::Num(text) => Ok(text.clone()),
            Node::Word(text) => Ok(text.clone()),
            Node::Arith(text) => Ok(text.clone()),
            Node::Variable(text) => Ok(text.trim_start_matches('$').to_string()),
            Node::RangeExpr { start, end } => {
                Ok(format!("range({start}, {})", end.saturating_add(1)))
            }
            Node::List(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.expression(item)?);
                }
                Ok(format!("[{}]", rendered.join(", ")))
            }
            Node::Comparison { op, left, right } => Ok(format!(
                "{} {} {}",
                self.expression(left)?,
                convert_operator(op),
                self.expression(right)?
            )),
            Node::Logical { op, left, right } => {
                let word = match op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                };
                Ok(format!(
                    "{} {word} {}",
                    self.expression(left)?,
                    self.expression(right)?
                ))
            }
            other => Err(CodegenError::UnsupportedConstruct {
                construct: kind_name(other),
                context: "expression",
            }),
        }
    }

    fn command_text(&self, node: &Node) -> Result<String, CodegenError> {
        match node {
            Node::Command { program, args } => {
                let mut text = program.clone();
                for arg in args {
                    text.push(' ');
                    text.push_str(arg);
                }
                Ok(text)
            }
            other => Err(CodegenError::UnsupportedConstruct {
                construct: kind_name(other),
                context: "command",
            }),
        }
    }
}

/// Test-style comparison flags map to Python operators; anything else
/// (`==`, `!=`, `<`, `>`) passes through unchanged.
fn convert_operator(op: &str) -> &str {
    match op {
        "-eq" => "==",
        "-ne" => "!=",
        "-lt" => "<",
        "-gt" => ">",
        "-le" => "<=",
        "-ge" => ">=",
        other => other,
    }
}

fn kind_name(node: &Node) -> &'static str {
    match node {
        Node::If { .. } => "if statement",
        Node::While { .. } => "while loop",
        Node::For { .. } => "for loop",
        Node::Case { .. } => "case statement",
        Node::Assign { .. } => "assignment",
        Node::Increment { .. } => "increment",
        Node::FunctionDef { .. } => "function definition",
        Node::FunctionCall { .. } => "function call",
        Node::Echo { .. } => "echo",
        Node::Command { .. } => "command",
        Node::Redirect { .. } => "redirection",
        Node::Pipeline { .. } => "pipeline",
        Node::Subshell { .. } => "subshell",
        Node::Logical { .. } => "logical expression",
        Node::Comparison { .. } => "comparison",
        Node::Return { .. } => "return",
        Node::Exit { .. } => "exit",
        Node::Break => "break",
        Node::Continue => "continue",
        Node::Str(_) => "string literal",
        Node::Interp(_) => "interpolated string",
        Node::Num(_) => "number literal",
        Node::Word(_) => "bare word",
        Node::Variable(_) => "variable reference",
        Node::Arith(_) => "arithmetic expression",
        Node::RangeExpr { .. } => "range expression",
        Node::List(_) => "list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CaseArm;

    fn generate(program: &[Node]) -> String {
        Generator::new().generate(program).unwrap()
    }

    #[test]
    fn test_assignment() {
        let program = [Node::Assign {
            name: "x".into(),
            value: Some(Box::new(Node::Num("5".into()))),
        }];
        assert_eq!(generate(&program), "x = 5");
    }

    #[test]
    fn test_empty_assignment_is_none() {
        let program = [Node::Assign {
            name: "x".into(),
            value: None,
        }];
        assert_eq!(generate(&program), "x = None");
    }

    #[test]
    fn test_if_with_comparison() {
        let program = [Node::If {
            condition: Box::new(Node::Comparison {
                op: "-gt".into(),
                left: Box::new(Node::Variable("$x".into())),
                right: Box::new(Node::Num("5".into())),
            }),
            then_body: vec![Node::Echo {
                value: Some(Box::new(Node::Str("big".into()))),
            }],
            else_body: None,
        }];
        assert_eq!(generate(&program), "if x > 5:\n    print(\"big\")");
    }

    #[test]
    fn test_if_else() {
        let program = [Node::If {
            condition: Box::new(Node::Comparison {
                op: "==".into(),
                left: Box::new(Node::Variable("$x".into())),
                right: Box::new(Node::Num("1".into())),
            }),
            then_body: vec![Node::Echo {
                value: Some(Box::new(Node::Str("a".into()))),
            }],
            else_body: Some(vec![Node::Echo {
                value: Some(Box::new(Node::Str("b".into()))),
            }]),
        }];
        assert_eq!(
            generate(&program),
            "if x == 1:\n    print(\"a\")\nelse:\n    print(\"b\")"
        );
    }

    #[test]
    fn test_empty_body_emits_pass() {
        let program = [Node::While {
            condition: Box::new(Node::Comparison {
                op: "-lt".into(),
                left: Box::new(Node::Variable("$i".into())),
                right: Box::new(Node::Num("3".into())),
            }),
            body: vec![],
        }];
        assert_eq!(generate(&program), "while i < 3:\n    pass");
    }

    #[test]
    fn test_for_range_is_inclusive() {
        let program = [Node::For {
            variable: "i".into(),
            iterable: Box::new(Node::RangeExpr { start: 1, end: 5 }),
            body: vec![Node::Echo {
                value: Some(Box::new(Node::Interp("{i}".into()))),
            }],
        }];
        assert_eq!(
            generate(&program),
            "for i in range(1, 6):\n    print(f\"{i}\")"
        );
    }

    #[test]
    fn test_range_upper_bound_saturates() {
        let program = [Node::For {
            variable: "i".into(),
            iterable: Box::new(Node::RangeExpr {
                start: 1,
                end: i64::MAX,
            }),
            body: vec![],
        }];
        assert_eq!(
            generate(&program),
            format!("for i in range(1, {}):\n    pass", i64::MAX)
        );
    }

    #[test]
    fn test_for_list() {
        let program = [Node::For {
            variable: "fruit".into(),
            iterable: Box::new(Node::List(vec![
                Node::Str("apple".into()),
                Node::Str("pear".into()),
            ])),
            body: vec![Node::Echo {
                value: Some(Box::new(Node::Interp("{fruit}".into()))),
            }],
        }];
        assert_eq!(
            generate(&program),
            "for fruit in [\"apple\", \"pear\"]:\n    print(f\"{fruit}\")"
        );
    }

    #[test]
    fn test_case_becomes_match() {
        let program = [Node::Case {
            scrutinee: "$x".into(),
            arms: vec![
                CaseArm {
                    label: Node::Str("a".into()),
                    body: vec![Node::Echo {
                        value: Some(Box::new(Node::Str("one".into()))),
                    }],
                },
                CaseArm {
                    label: Node::Str("b".into()),
                    body: vec![Node::Echo {
                        value: Some(Box::new(Node::Str("two".into()))),
                    }],
                },
            ],
        }];
        assert_eq!(
            generate(&program),
            "match x:\n    case \"a\":\n        print(\"one\")\n    case \"b\":\n        print(\"two\")"
        );
    }

    #[test]
    fn test_command_gets_subprocess_import() {
        let program = [Node::Command {
            program: "ls".into(),
            args: vec!["-a".into()],
        }];
        assert_eq!(
            generate(&program),
            "import subprocess\n\nsubprocess.run(\"ls -a\", shell=True)"
        );
    }

    #[test]
    fn test_command_with_variable_uses_fstring() {
        let program = [Node::Command {
            program: "cat".into(),
            args: vec!["$file".into()],
        }];
        assert_eq!(
            generate(&program),
            "import subprocess\n\nsubprocess.run(f\"cat {file}\", shell=True)"
        );
    }

    #[test]
    fn test_exit_gets_sys_import() {
        let program = [Node::Exit { code: None }];
        assert_eq!(generate(&program), "import sys\n\nsys.exit(0)");
    }

    #[test]
    fn test_nested_exit_still_imports_sys() {
        let program = [Node::If {
            condition: Box::new(Node::Comparison {
                op: "-eq".into(),
                left: Box::new(Node::Variable("$x".into())),
                right: Box::new(Node::Num("0".into())),
            }),
            then_body: vec![Node::Exit {
                code: Some(Box::new(Node::Num("1".into()))),
            }],
            else_body: None,
        }];
        assert_eq!(
            generate(&program),
            "import sys\n\nif x == 0:\n    sys.exit(1)"
        );
    }

    #[test]
    fn test_redirect_from_command() {
        let program = [Node::Redirect {
            file: "listing.txt".into(),
            content: Some(Box::new(Node::Command {
                program: "ls".into(),
                args: vec![],
            })),
        }];
        assert_eq!(
            generate(&program),
            "import subprocess\n\nwith open('listing.txt', 'w') as f:\n    f.write(subprocess.check_output('ls', shell=True).decode('utf-8'))"
        );
    }

    #[test]
    fn test_redirect_from_echo_value() {
        let program = [Node::Redirect {
            file: "greeting.txt".into(),
            content: Some(Box::new(Node::Str("hi".into()))),
        }];
        assert_eq!(
            generate(&program),
            "with open('greeting.txt', 'w') as f:\n    f.write(str(\"hi\"))"
        );
    }

    #[test]
    fn test_pipeline_wiring() {
        let program = [Node::Pipeline {
            left: Box::new(Node::Command {
                program: "cat".into(),
                args: vec!["notes.txt".into()],
            }),
            right: Box::new(Node::Command {
                program: "grep".into(),
                args: vec!["todo".into()],
            }),
        }];
        assert_eq!(
            generate(&program),
            "import subprocess\n\n\
             p1 = subprocess.Popen('cat notes.txt', shell=True, stdout=subprocess.PIPE)\n\
             p2 = subprocess.Popen('grep todo', shell=True, stdin=p1.stdout, stdout=subprocess.PIPE)\n\
             p1.stdout.close()\n\
             output, _ = p2.communicate()"
        );
    }

    #[test]
    fn test_subshell() {
        let program = [Node::Subshell {
            command: Box::new(Node::Command {
                program: "ls".into(),
                args: vec!["tmp".into()],
            }),
        }];
        assert_eq!(
            generate(&program),
            "import subprocess\n\noutput = subprocess.check_output('ls tmp', shell=True).decode()"
        );
    }

    #[test]
    fn test_function_def_and_call() {
        let program = [
            Node::FunctionDef {
                name: "greet".into(),
                params: vec![],
                body: vec![
                    Node::Echo {
                        value: Some(Box::new(Node::Str("hello".into()))),
                    },
                    Node::Return {
                        value: Some(Box::new(Node::Num("1".into()))),
                    },
                ],
            },
            Node::FunctionCall {
                name: "greet".into(),
                args: vec![],
            },
        ];
        assert_eq!(
            generate(&program),
            "def greet():\n    print(\"hello\")\n    return 1\ngreet()"
        );
    }

    #[test]
    fn test_echo_without_value() {
        let program = [Node::Echo { value: None }];
        assert_eq!(generate(&program), "print('')");
    }

    #[test]
    fn test_bare_leaf_is_rejected_as_statement() {
        let err = Generator::new()
            .generate(&[Node::Num("5".into())])
            .unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnsupportedConstruct {
                construct: "number literal",
                context: "statement",
            }
        );
    }

    #[test]
    fn test_logical_condition() {
        let program = [Node::While {
            condition: Box::new(Node::Logical {
                op: LogicalOp::And,
                left: Box::new(Node::Comparison {
                    op: "-gt".into(),
                    left: Box::new(Node::Variable("$x".into())),
                    right: Box::new(Node::Num("1".into())),
                }),
                right: Box::new(Node::Comparison {
                    op: "-lt".into(),
                    left: Box::new(Node::Variable("$y".into())),
                    right: Box::new(Node::Num("2".into())),
                }),
            }),
            body: vec![Node::Break],
        }];
        assert_eq!(
            generate(&program),
            "while x > 1 and y < 2:\n    break"
        );
    }
}
