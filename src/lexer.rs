//! Turns program text into tokens, one at a time, on demand.

use std::iter::Peekable;
use std::str::Chars;

use log::trace;

use crate::{Error, ErrorKind, Keyword, Literal, Result, Symbol, Token, ValueType};

/// A `Lexer` walks the source with a single character of lookahead.
///
/// Once the source is exhausted every call to [`Lexer::next_token`] yields
/// [`Token::Eof`].
#[derive(Debug)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// 1-based line of the next unread character.
    line: usize,
    /// Line on which the most recent token started.
    token_line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            token_line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.token_line
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks();
        self.token_line = self.line;
        let token = match self.peek_char() {
            None => return Ok(Token::Eof),
            Some(c) if c.is_ascii_digit() => self.number()?,
            Some(c) if c.is_ascii_alphabetic() => self.word()?,
            Some('"') => self.string()?,
            Some(_) => self.symbol()?,
        };
        trace!("line {}: {token}", self.token_line);
        Ok(token)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_blanks(&mut self) {
        loop {
            while let Some(' ' | '\t' | '\n' | '\r') = self.peek_char() {
                self.next_char();
            }
            if self.peek_char() != Some('#') {
                return;
            }
            while let Some(c) = self.peek_char() {
                if c == '\n' {
                    break;
                }
                self.next_char();
            }
        }
    }

    fn take_digits(&mut self, raw: &mut String) {
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_digit() {
                break;
            }
            raw.push(c);
            self.next_char();
        }
    }

    fn number(&mut self) -> Result<Token> {
        let mut raw = String::new();
        self.take_digits(&mut raw);
        if self.peek_char() == Some('.') {
            raw.push('.');
            self.next_char();
            self.take_digits(&mut raw);
            let value = raw.parse::<f64>().map_err(|_| self.bad_number(&raw))?;
            return Ok(Token::Const {
                raw,
                literal: Literal::Float(value),
            });
        }
        let value = raw.parse::<i32>().map_err(|_| self.bad_number(&raw))?;
        Ok(Token::Const {
            raw,
            literal: Literal::Int(value),
        })
    }

    fn bad_number(&self, raw: &str) -> Error {
        let message = format!("numeric constant {raw} is out of range");
        Error::new(ErrorKind::Parse(message), self.line)
    }

    /// A lone letter is a variable; two or more letters must spell a keyword.
    fn word(&mut self) -> Result<Token> {
        let Some(first) = self.next_char() else {
            return Ok(Token::Eof);
        };
        if !self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Ok(Token::Var {
                name: first,
                var_type: ValueType::of_var(first),
            });
        }

        let mut raw = String::from(first);
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            raw.push(c);
            self.next_char();
        }
        let word = raw.to_ascii_uppercase();
        match Keyword::from_word(&word) {
            Some(keyword) => Ok(Token::Keyword { keyword, raw }),
            None => Err(Error::new(ErrorKind::UnknownKeyword(word), self.line)),
        }
    }

    fn string(&mut self) -> Result<Token> {
        let line = self.line;
        self.next_char(); // opening quote
        let mut value = String::new();
        loop {
            match self.next_char() {
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(Error::new(ErrorKind::UnterminatedString(value), line)),
            }
        }
        Ok(Token::Const {
            raw: value.clone(),
            literal: Literal::Str(value),
        })
    }

    fn symbol(&mut self) -> Result<Token> {
        let Some(first) = self.next_char() else {
            return Ok(Token::Eof);
        };
        let mut text = String::from(first);
        if matches!(first, '>' | '!' | '<' | '=') && self.peek_char() == Some('=') {
            text.push('=');
            self.next_char();
        }
        match Symbol::from_text(&text) {
            Some(symbol) => Ok(Token::Symbol(symbol)),
            None => Err(Error::new(ErrorKind::UnknownSymbol(text), self.line)),
        }
    }
}

/// Yields every token up to, but not including, end of input.
impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof) => None,
            other => Some(other),
        }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn symbols(input: &str) -> Vec<Symbol> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| match token {
                Token::Symbol(symbol) => symbol,
                other => panic!("expected a symbol, got {other}"),
            })
            .collect()
    }

    const ALL_SYMBOLS: &[Symbol] = &[Lt, Gt, Eq, Geq, Leq, Neq, EqEq, Mult, Plus, Div, Minus];

    #[test]
    fn empty_source_is_eof_forever() {
        let mut lexer = Lexer::new("");
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        }
    }

    #[test]
    fn comment_only() {
        let mut lexer = Lexer::new("# nothing to see\n   # here either");
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert_eq!(lexer.line(), 2);
    }

    #[test]
    fn int_constant() {
        let mut lexer = Lexer::new("1\n");
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token,
            Token::Const {
                raw: "1".into(),
                literal: Literal::Int(1)
            }
        );
        assert_eq!(token.var_type(), Some(ValueType::Int));
    }

    #[test]
    fn float_constant() {
        let token = Lexer::new("1.125").next_token().unwrap();
        assert_eq!(
            token,
            Token::Const {
                raw: "1.125".into(),
                literal: Literal::Float(1.125)
            }
        );
        assert_eq!(token.var_type(), Some(ValueType::Float));
    }

    #[test]
    fn float_without_fraction_digits() {
        let token = Lexer::new("5.").next_token().unwrap();
        assert_eq!(token.var_type(), Some(ValueType::Float));
    }

    #[test]
    fn huge_int_is_rejected() {
        let err = Lexer::new("99999999999").next_token().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Parse(_)));
    }

    #[test]
    fn string_constant_is_raw() {
        let token = Lexer::new(r#""hi \n there""#).next_token().unwrap();
        assert_eq!(
            token,
            Token::Const {
                raw: r"hi \n there".into(),
                literal: Literal::Str(r"hi \n there".into())
            }
        );
    }

    #[test]
    fn unterminated_string() {
        let err = Lexer::new("\n\"oops").next_token().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString("oops".into()));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn variables_carry_their_type() {
        let tokens = tokenize("a i s Z").unwrap();
        let types: Vec<_> = tokens.iter().map(|t| t.var_type().unwrap()).collect();
        assert_eq!(
            types,
            [ValueType::Float, ValueType::Int, ValueType::Str, ValueType::Str]
        );
    }

    #[test]
    fn variable_followed_by_digit() {
        let tokens = tokenize("i2").unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0], Token::Var { name: 'i', .. }));
    }

    #[test]
    fn keywords_fold_case() {
        let tokens = tokenize("pRiNtLn If then ELSE endif FOR to EndFor print").unwrap();
        let expected = [
            Keyword::Println,
            Keyword::If,
            Keyword::Then,
            Keyword::Else,
            Keyword::EndIf,
            Keyword::For,
            Keyword::To,
            Keyword::EndFor,
            Keyword::Print,
        ];
        assert_eq!(tokens.len(), expected.len());
        for (token, keyword) in tokens.iter().zip(expected) {
            assert!(token.is_keyword(keyword), "{token} is not {keyword}");
        }
    }

    #[test]
    fn unknown_keyword() {
        let err = tokenize("while").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownKeyword("WHILE".into()));
    }

    #[test]
    fn keyword_keeps_source_spelling() {
        let token = Lexer::new("pRiNt 3").next_token().unwrap();
        assert!(token.is_keyword(Keyword::Print));
        assert_eq!(
            token,
            Token::Keyword {
                keyword: Keyword::Print,
                raw: "pRiNt".into()
            }
        );
        assert_eq!(token.to_string(), "KEYWORD pRiNt");
    }

    #[test]
    fn letters_are_ascii_only() {
        let err = tokenize("é = \"x\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownSymbol("é".into()));
        let err = tokenize("iß").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownSymbol("ß".into()));
    }

    #[test]
    fn symbols_space_separated() {
        assert_eq!(symbols("<> = >= <= != == * + / -"), ALL_SYMBOLS);
    }

    #[test]
    fn symbols_adjacent() {
        assert_eq!(symbols("<> =>=<=!===*+/-"), ALL_SYMBOLS);
    }

    #[test]
    fn greedy_pairs() {
        assert_eq!(
            symbols("+-*/=<<===!=>=>"),
            [Plus, Minus, Mult, Div, Eq, Lt, Leq, EqEq, Neq, Geq, Gt]
        );
    }

    #[test]
    fn unknown_symbol() {
        assert_eq!(
            tokenize("i = 3 ; ").unwrap_err().kind,
            ErrorKind::UnknownSymbol(";".into())
        );
        assert_eq!(
            tokenize("!").unwrap_err().kind,
            ErrorKind::UnknownSymbol("!".into())
        );
    }

    #[test]
    fn factorial_program() {
        let source = "j=1\nn=10\nfor i = 1 to n+1\n  j = j * i\nendfor\nprintln j\n";
        let mut lexer = Lexer::new(source);
        let mut count = 0;
        while !lexer.next_token().unwrap().is_eof() {
            count += 1;
        }
        assert_eq!(count, 22);
        assert_eq!(lexer.line(), 7);
    }
}
