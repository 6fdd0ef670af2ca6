//! A single-pass compiler from a tiny scripting language to NASM x86-64 assembly.
//!
//! There is no syntax tree: the parser emits instructions as soon as it
//! recognises each construct. Every variable is one letter, and the letter
//! alone fixes its type (see [`ValueType::of_var`]).

use indexmap::IndexMap;
use log::debug;

mod codegen;
mod emit;
mod error;
mod lexer;
mod parse;
mod token;
mod types;

pub use emit::Emitter;
pub use error::{Error, ErrorKind, Result};
pub use lexer::{Lexer, tokenize};
pub use token::{Keyword, Literal, Symbol, Token};
pub use types::{ValueType, check_types};

pub fn compile(source: &str) -> Result<Vec<String>> {
    Compiler::new(source).compile()
}

/// State for one compilation. Build a fresh one per program so labels never collide.
#[derive(Debug)]
pub struct Compiler<'a> {
    lexer: Lexer<'a>,
    token: Token,
    /// Line of the current token, for error messages.
    line: usize,
    /// Line of the token consumed just before the current one.
    last_line: usize,
    emitter: Emitter,
    label_id: usize,
    strings: IndexMap<String, String>,
    /// Float constant bits to label.
    floats: IndexMap<u64, String>,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a str) -> Self {
        Compiler {
            lexer: Lexer::new(source),
            token: Token::Eof,
            line: 1,
            last_line: 1,
            emitter: Emitter::new(),
            label_id: 0,
            strings: IndexMap::new(),
            floats: IndexMap::new(),
        }
    }

    pub fn compile(mut self) -> Result<Vec<String>> {
        self.emitter.prologue();
        self.advance()?;
        self.statements(&[])?;
        self.emitter.epilogue();
        Ok(self.emitter.finish())
    }

    fn advance(&mut self) -> Result<()> {
        self.token = self.lexer.next_token()?;
        self.last_line = self.line;
        self.line = self.lexer.line();
        Ok(())
    }

    fn next_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}_{}", self.label_id);
        self.label_id += 1;
        debug!("allocated label {label}");
        label
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.line)
    }
}
