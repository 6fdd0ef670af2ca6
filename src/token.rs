use std::fmt;

use crate::ValueType;

/// One lexical unit. Each variant carries only the fields that make sense for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Eof,
    Const { raw: String, literal: Literal },
    /// A single-letter variable; its type follows from the letter.
    Var { name: char, var_type: ValueType },
    /// A keyword, along with its spelling in the source.
    Keyword { keyword: Keyword, raw: String },
    Symbol(Symbol),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn value_type(&self) -> ValueType {
        match self {
            Literal::Int(_) => ValueType::Int,
            Literal::Float(_) => ValueType::Float,
            Literal::Str(_) => ValueType::Str,
        }
    }
}

impl Token {
    pub fn var_type(&self) -> Option<ValueType> {
        match self {
            Token::Const { literal, .. } => Some(literal.value_type()),
            Token::Var { var_type, .. } => Some(*var_type),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword { keyword: k, .. } if *k == keyword)
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        matches!(self, Token::Symbol(s) if *s == symbol)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "EOF"),
            Token::Const { raw, literal } => match literal {
                Literal::Str(_) => write!(f, "CONST STR \"{raw}\""),
                _ => write!(f, "CONST {} {raw}", literal.value_type()),
            },
            Token::Var { name, var_type } => write!(f, "VAR {var_type} {name}"),
            Token::Keyword { raw, .. } => write!(f, "KEYWORD {raw}"),
            Token::Symbol(symbol) => write!(f, "SYMBOL {symbol}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Then,
    Else,
    EndIf,
    For,
    To,
    EndFor,
    Print,
    Println,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "IF" => Keyword::If,
            "THEN" => Keyword::Then,
            "ELSE" => Keyword::Else,
            "ENDIF" => Keyword::EndIf,
            "FOR" => Keyword::For,
            "TO" => Keyword::To,
            "ENDFOR" => Keyword::EndFor,
            "PRINT" => Keyword::Print,
            "PRINTLN" => Keyword::Println,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::EndIf => "ENDIF",
            Keyword::For => "FOR",
            Keyword::To => "TO",
            Keyword::EndFor => "ENDFOR",
            Keyword::Print => "PRINT",
            Keyword::Println => "PRINTLN",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    // Arithmetic
    Plus, Minus, Mult, Div,
    // Comparisons
    EqEq, Neq, Lt, Gt, Leq, Geq,
    // Assignment
    Eq,
}

impl Symbol {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "+" => Symbol::Plus,
            "-" => Symbol::Minus,
            "*" => Symbol::Mult,
            "/" => Symbol::Div,
            "==" => Symbol::EqEq,
            "!=" => Symbol::Neq,
            "<" => Symbol::Lt,
            ">" => Symbol::Gt,
            "<=" => Symbol::Leq,
            ">=" => Symbol::Geq,
            "=" => Symbol::Eq,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Mult => "*",
            Symbol::Div => "/",
            Symbol::EqEq => "==",
            Symbol::Neq => "!=",
            Symbol::Lt => "<",
            Symbol::Gt => ">",
            Symbol::Leq => "<=",
            Symbol::Geq => ">=",
            Symbol::Eq => "=",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Symbol::Plus | Symbol::Minus | Symbol::Mult | Symbol::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Symbol::EqEq | Symbol::Neq | Symbol::Lt | Symbol::Gt | Symbol::Leq | Symbol::Geq
        )
    }

    pub fn is_binary(self) -> bool {
        self.is_arithmetic() || self.is_comparison()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
