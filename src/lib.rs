// Choco Language Interpreter Library
//
// Lexer, Pratt parser and tree-walking evaluator for a small expression
// language with first-class functions, closures, arrays and hashes.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod stack;

pub use ast::{Expression, Program, Statement};
pub use environment::{Env, Environment};
pub use error::{ChocoError, ParseError, RuntimeError, Span};
pub use evaluator::{EvalConfig, Evaluator};
pub use lexer::{Lexer, Token, TokenType};
pub use object::Object;
pub use parser::{parse, Parser};

pub use repl::start as start_repl;
pub use runner::{default_script, run_file, run_source, RunOptions};
