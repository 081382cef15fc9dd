//! Shell-to-Python source translator.
//!
//! Compilation is a fixed three-stage pipeline: [`lexer::Lexer`] scans the
//! source into tokens, [`parser::Parser`] builds a syntax tree, and
//! [`codegen::Generator`] renders the tree as Python. [`compile`] runs all
//! three and surfaces the first error from any stage.

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Node;
pub use codegen::{CodegenError, Generator};
pub use lexer::{LexError, Lexer};
pub use parser::{Parser, SyntaxError};
pub use token::{Token, TokenKind};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Translates shell source to Python source.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(), "lexed input");
    let program = Parser::new(tokens).parse()?;
    debug!(statements = program.len(), "parsed program");
    let python = Generator::new().generate(&program)?;
    Ok(python)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_loop() {
        let python = compile("i=1\nwhile [ $i -le 3 ]; do echo $i; done").unwrap();
        assert_eq!(
            python,
            "i = 1\nwhile i <= 3:\n    print(f\"{i}\")\n    i += 1"
        );
    }

    #[test]
    fn test_branching_script() {
        let python = compile("x=7\nif [ $x -gt 5 ]; then echo \"big\"; else echo \"small\"; fi")
            .unwrap();
        assert_eq!(
            python,
            "x = 7\nif x > 5:\n    print(\"big\")\nelse:\n    print(\"small\")"
        );
    }

    #[test]
    fn test_for_over_range() {
        let python = compile("for i in {1..5}; do echo $i; done").unwrap();
        assert_eq!(python, "for i in range(1, 6):\n    print(f\"{i}\")");
    }

    #[test]
    fn test_case_script() {
        let python =
            compile("fruit=\"apple\"\ncase $fruit in \"apple\") echo \"red\";; \"pear\") echo \"green\";; esac")
                .unwrap();
        assert_eq!(
            python,
            "fruit = \"apple\"\nmatch fruit:\n    case \"apple\":\n        print(\"red\")\n    case \"pear\":\n        print(\"green\")"
        );
    }

    #[test]
    fn test_function_script() {
        let python = compile("greet() { echo \"hello\"; }\ngreet()").unwrap();
        assert_eq!(python, "def greet():\n    print(\"hello\")\ngreet()");
    }

    #[test]
    fn test_command_pipeline_script() {
        let python = compile("cat notes.txt | grep todo").unwrap();
        assert_eq!(
            python,
            "import subprocess\n\n\
             p1 = subprocess.Popen('cat notes.txt', shell=True, stdout=subprocess.PIPE)\n\
             p2 = subprocess.Popen('grep todo', shell=True, stdin=p1.stdout, stdout=subprocess.PIPE)\n\
             p1.stdout.close()\n\
             output, _ = p2.communicate()"
        );
    }

    #[test]
    fn test_echo_pipeline_script() {
        let python = compile("echo hi | wc -l").unwrap();
        assert_eq!(
            python,
            "import subprocess\n\n\
             p1 = subprocess.Popen('echo hi', shell=True, stdout=subprocess.PIPE)\n\
             p2 = subprocess.Popen('wc -l', shell=True, stdin=p1.stdout, stdout=subprocess.PIPE)\n\
             p1.stdout.close()\n\
             output, _ = p2.communicate()"
        );
    }

    #[test]
    fn test_repeated_compilation_is_byte_identical() {
        let source = "x=1\n\
                      while [ $x -le 3 ]; do echo $x; done\n\
                      cat notes.txt | grep todo\n\
                      case $x in 1) echo one;; esac\n\
                      exit 0";
        assert_eq!(compile(source).unwrap(), compile(source).unwrap());
    }

    #[test]
    fn test_arithmetic_update() {
        let python = compile("x=1\nx=$((x + 1))\necho $x").unwrap();
        assert_eq!(python, "x = 1\nx = x + 1\nprint(f\"{x}\")");
    }

    #[test]
    fn test_exit_imports_sys() {
        let python = compile("echo \"bye\"\nexit 2").unwrap();
        assert_eq!(python, "import sys\n\nprint(\"bye\")\nsys.exit(2)");
    }

    #[test]
    fn test_lex_error_propagates() {
        let err = compile("echo \"oops").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
    }

    #[test]
    fn test_syntax_error_propagates() {
        let err = compile("if [ $x -gt 5 ]; then echo hi").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)));
    }
}
