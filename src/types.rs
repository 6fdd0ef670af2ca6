use std::fmt;

use crate::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Str,
    Bool,
    /// Internal sentinel, never the type of a valid program value.
    None,
}

impl ValueType {
    /// Type of the variable named by `letter`.
    ///
    /// `a`-`h` hold floats, `i`-`n` hold integers and every other letter holds
    /// a string. Case does not matter.
    pub fn of_var(letter: char) -> Self {
        match letter.to_ascii_lowercase() {
            'a'..='h' => ValueType::Float,
            'i'..='n' => ValueType::Int,
            _ => ValueType::Str,
        }
    }

    pub fn size(self) -> usize {
        match self {
            ValueType::Int => 4,
            ValueType::Float | ValueType::Str => 8,
            ValueType::Bool => 1,
            ValueType::None => 0,
        }
    }

    /// Zero-initialised NASM data operand sized for this type, e.g. `dd 0`.
    pub fn storage(self) -> Option<String> {
        let directive = match self.size() {
            1 => "db",
            4 => "dd",
            8 => "dq",
            _ => return None,
        };
        let zero = if self == ValueType::Float { "0.0" } else { "0" };
        Some(format!("{directive} {zero}"))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "INT",
            ValueType::Float => "FLOAT",
            ValueType::Str => "STR",
            ValueType::Bool => "BOOL",
            ValueType::None => "NONE",
        };
        f.write_str(name)
    }
}

/// The language has no coercions: two types are compatible only when equal.
pub fn check_types(expected: ValueType, found: ValueType, line: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::TypeMismatch { expected, found }, line))
    }
}
