use log::debug;

use crate::*;

impl Compiler<'_> {
    /// Parses statements until end of input or one of `terminators`, which is left unconsumed.
    pub(crate) fn statements(&mut self, terminators: &[Keyword]) -> Result<()> {
        while !self.token.is_eof() && !terminators.iter().any(|&kw| self.token.is_keyword(kw)) {
            self.statement()?;
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        match &self.token {
            Token::Var { .. } => self.assignment(),
            Token::Keyword {
                keyword: Keyword::Print | Keyword::Println,
                ..
            } => self.print(),
            Token::Keyword {
                keyword: Keyword::If,
                ..
            } => self.if_statement(),
            Token::Keyword {
                keyword: Keyword::For,
                ..
            } => self.for_statement(),
            other => {
                let message = format!("cannot start a statement with {other}");
                Err(self.error(ErrorKind::Parse(message)))
            }
        }
    }

    fn expect_symbol(&mut self, symbol: Symbol) -> Result<()> {
        if !self.token.is_symbol(symbol) {
            let message = format!("expected SYMBOL {symbol}, found {}", self.token);
            return Err(self.error(ErrorKind::Parse(message)));
        }
        self.advance()?;
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if !self.token.is_keyword(keyword) {
            let message = format!("expected KEYWORD {keyword}, found {}", self.token);
            return Err(self.error(ErrorKind::Parse(message)));
        }
        self.advance()?;
        Ok(())
    }

    fn expect_var(&self) -> Result<(char, ValueType)> {
        match self.token {
            Token::Var { name, var_type } => Ok((name, var_type)),
            ref other => {
                let message = format!("expected VAR, found {other}");
                Err(self.error(ErrorKind::Parse(message)))
            }
        }
    }

    fn assignment(&mut self) -> Result<()> {
        let (name, var_type) = self.expect_var()?;
        debug!("line {}: assignment to {name}", self.line);
        let storage = self.declare_var(name, var_type)?;
        self.advance()?;
        self.expect_symbol(Symbol::Eq)?;

        let expr_type = self.expr()?;
        check_types(var_type, expr_type, self.last_line)?;
        let store = match var_type {
            ValueType::Int => format!("mov {storage}, EAX"),
            ValueType::Float => format!("movq {storage}, XMM0"),
            ValueType::Str => format!("mov {storage}, RAX"),
            ValueType::Bool => format!("mov {storage}, AL"),
            ValueType::None => {
                let message = format!("cannot assign a value of type {var_type}");
                return Err(self.error(ErrorKind::Unsupported(message)));
            }
        };
        self.emitter.emit(store);
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        let newline = self.token.is_keyword(Keyword::Println);
        debug!("line {}: print (newline: {newline})", self.line);
        self.advance()?;

        match self.expr()? {
            ValueType::Int => {
                self.emitter.add_data("INT_FMT: db '%d', 0");
                self.emitter.emit("mov RCX, INT_FMT");
                self.emitter.emit("mov EDX, EAX");
            }
            ValueType::Float => {
                self.emitter.add_data("FLOAT_FMT: db '%.16g', 0");
                self.emitter.emit("mov RCX, FLOAT_FMT");
                self.emitter.emit("movq RDX, XMM0");
            }
            ValueType::Str => self.emitter.emit("mov RCX, RAX"),
            ValueType::Bool => {
                self.emitter.add_data("TRUE: db 'true', 0");
                self.emitter.add_data("FALSE: db 'false', 0");
                self.emitter.emit("cmp AL, 1");
                self.emitter.emit("mov RCX, FALSE");
                self.emitter.emit("mov RDX, TRUE");
                self.emitter.emit("cmovz RCX, RDX");
            }
            other => {
                let message = format!("cannot print a value of type {other}");
                return Err(self.error(ErrorKind::Unsupported(message)));
            }
        }

        // 32 bytes of shadow space for the callee
        self.emitter.emit("sub RSP, 0x20");
        self.emitter.emit("extern printf");
        self.emitter.emit("call printf");
        if newline {
            self.emitter.emit("extern putchar");
            self.emitter.emit("mov RCX, 10");
            self.emitter.emit("call putchar");
        }
        self.emitter.emit("add RSP, 0x20");
        Ok(())
    }

    fn if_statement(&mut self) -> Result<()> {
        debug!("line {}: if", self.line);
        self.expect_keyword(Keyword::If)?;
        let cond_type = self.expr()?;
        check_types(ValueType::Bool, cond_type, self.last_line)?;

        let else_label = self.next_label("else");
        let end_label = self.next_label("endif");
        self.emitter.emit("cmp AL, 0x01");
        self.emitter.emit(format!("jne {else_label}"));

        self.expect_keyword(Keyword::Then)?;
        self.statements(&[Keyword::Else, Keyword::EndIf])?;
        if self.token.is_eof() {
            let message = "expected ELSE or ENDIF, found EOF".to_string();
            return Err(self.error(ErrorKind::Parse(message)));
        }

        let has_else = self.token.is_keyword(Keyword::Else);
        if has_else {
            self.emitter.emit(format!("jmp {end_label}"));
        }
        self.emitter.label(&else_label);
        if has_else {
            self.advance()?;
            self.statements(&[Keyword::EndIf])?;
        }
        self.expect_keyword(Keyword::EndIf)?;
        if has_else {
            self.emitter.label(&end_label);
        }
        Ok(())
    }

    /// The end bound is evaluated again on every pass through the loop.
    fn for_statement(&mut self) -> Result<()> {
        debug!("line {}: for", self.line);
        self.expect_keyword(Keyword::For)?;
        let (name, var_type) = self.expect_var()?;
        check_types(ValueType::Int, var_type, self.line)?;
        let storage = self.declare_var(name, var_type)?;
        self.advance()?;
        self.expect_symbol(Symbol::Eq)?;

        let from_type = self.expr()?;
        check_types(ValueType::Int, from_type, self.last_line)?;
        self.emitter.emit(format!("mov {storage}, EAX"));
        self.expect_keyword(Keyword::To)?;

        let start_label = self.next_label("startFor");
        let end_label = self.next_label("endFor");
        self.emitter.label(&start_label);
        let to_type = self.expr()?;
        check_types(ValueType::Int, to_type, self.last_line)?;
        self.emitter.emit(format!("cmp {storage}, EAX"));
        self.emitter.emit(format!("jge {end_label}"));

        self.statements(&[Keyword::EndFor])?;
        self.expect_keyword(Keyword::EndFor)?;
        self.emitter.emit(format!("inc DWORD {storage}"));
        self.emitter.emit(format!("jmp {start_label}"));
        self.emitter.label(&end_label);
        Ok(())
    }
}
