use log::debug;

use crate::*;

/// Integer opcodes. The left operand sits in EBX, the right in EAX; the result lands in EAX (or AL).
fn int_opcodes(symbol: Symbol) -> Option<&'static [&'static str]> {
    Some(match symbol {
        Symbol::Plus => &["add EAX, EBX"],
        Symbol::Mult => &["imul EAX, EBX"],
        Symbol::Minus => &["xchg EAX, EBX", "sub EAX, EBX"],
        Symbol::Div => &["xchg EAX, EBX", "cdq", "idiv EBX"],
        Symbol::EqEq => &["cmp EBX, EAX", "setz AL"],
        Symbol::Neq => &["cmp EBX, EAX", "setnz AL"],
        Symbol::Lt => &["cmp EBX, EAX", "setl AL"],
        Symbol::Gt => &["cmp EBX, EAX", "setg AL"],
        Symbol::Leq => &["cmp EBX, EAX", "setle AL"],
        Symbol::Geq => &["cmp EBX, EAX", "setge AL"],
        Symbol::Eq => return None,
    })
}

/// Float opcodes. The left operand sits in XMM1, the right in XMM0; the result lands in XMM0 (or AL).
fn float_opcodes(symbol: Symbol) -> Option<&'static [&'static str]> {
    Some(match symbol {
        Symbol::Plus => &["addsd XMM0, XMM1"],
        Symbol::Mult => &["mulsd XMM0, XMM1"],
        Symbol::Minus => &["subsd XMM1, XMM0", "movq XMM0, XMM1"],
        Symbol::Div => &["divsd XMM1, XMM0", "movq XMM0, XMM1"],
        // comisd sets CF/ZF like an unsigned compare
        Symbol::EqEq => &["comisd XMM1, XMM0", "setz AL"],
        Symbol::Neq => &["comisd XMM1, XMM0", "setnz AL"],
        Symbol::Lt => &["comisd XMM1, XMM0", "setb AL"],
        Symbol::Gt => &["comisd XMM1, XMM0", "seta AL"],
        Symbol::Leq => &["comisd XMM1, XMM0", "setbe AL"],
        Symbol::Geq => &["comisd XMM1, XMM0", "setae AL"],
        Symbol::Eq => return None,
    })
}

fn load(value_type: ValueType, operand: &str) -> Option<String> {
    match value_type {
        ValueType::Int => Some(format!("mov EAX, {operand}")),
        ValueType::Float => Some(format!("movq XMM0, {operand}")),
        ValueType::Str => Some(format!("mov RAX, {operand}")),
        ValueType::Bool => Some(format!("mov AL, {operand}")),
        ValueType::None => None,
    }
}

/// The operand list of a `db` declaration holding `value` and its NUL terminator.
fn string_bytes(value: &str) -> String {
    if value.is_empty() {
        "0".to_string()
    } else if value.chars().any(char::is_control) || (value.contains('\'') && value.contains('"')) {
        let bytes: Vec<String> = value.bytes().map(|b| b.to_string()).collect();
        format!("{}, 0", bytes.join(", "))
    } else if value.contains('\'') {
        format!("\"{value}\", 0")
    } else {
        format!("'{value}', 0")
    }
}

impl Compiler<'_> {
    /// `expr := atom [ symbol atom ]`. There is a single level of binary operators.
    pub(crate) fn expr(&mut self) -> Result<ValueType> {
        let left = self.atom()?;
        let op = match self.token {
            Token::Symbol(symbol) if symbol.is_binary() => symbol,
            _ => return Ok(left),
        };
        self.spill(left)?;
        self.advance()?;

        let right = self.atom()?;
        check_types(left, right, self.last_line)?;
        self.unspill(left);
        self.binary(left, op)
    }

    fn spill(&mut self, value_type: ValueType) -> Result<()> {
        match value_type {
            ValueType::Int => self.emitter.emit("push RAX"),
            ValueType::Float => {
                self.emitter.emit("sub RSP, 0x08");
                self.emitter.emit("movq [RSP], XMM0");
            }
            other => {
                let message = format!("cannot combine values of type {other}");
                return Err(self.error(ErrorKind::Unsupported(message)));
            }
        }
        Ok(())
    }

    /// Brings the saved left operand back into the second scratch register.
    fn unspill(&mut self, value_type: ValueType) {
        match value_type {
            ValueType::Int => self.emitter.emit("pop RBX"),
            ValueType::Float => {
                self.emitter.emit("movq XMM1, [RSP]");
                self.emitter.emit("add RSP, 0x08");
            }
            _ => {}
        }
    }

    fn binary(&mut self, operand_type: ValueType, op: Symbol) -> Result<ValueType> {
        let opcodes = match operand_type {
            ValueType::Int => int_opcodes(op),
            ValueType::Float => float_opcodes(op),
            _ => None,
        };
        let Some(opcodes) = opcodes else {
            let message = format!("cannot emit opcode for {operand_type} {op}");
            return Err(self.error(ErrorKind::Unsupported(message)));
        };
        for opcode in opcodes {
            self.emitter.emit(opcode);
        }
        Ok(if op.is_comparison() {
            ValueType::Bool
        } else {
            operand_type
        })
    }

    fn atom(&mut self) -> Result<ValueType> {
        let token = self.token.clone();
        let (value_type, operand) = match &token {
            Token::Const { raw, literal } => {
                let operand = match literal {
                    Literal::Int(value) => value.to_string(),
                    Literal::Float(value) => format!("[{}]", self.intern_float(*value, raw)),
                    Literal::Str(value) => self.intern_string(value),
                };
                (literal.value_type(), operand)
            }
            Token::Var { name, var_type } => (*var_type, self.declare_var(*name, *var_type)?),
            other => {
                let message = format!("expected a constant or variable, found {other}");
                return Err(self.error(ErrorKind::Parse(message)));
            }
        };
        let Some(instruction) = load(value_type, &operand) else {
            let message = format!("cannot load a value of type {value_type}");
            return Err(self.error(ErrorKind::Unsupported(message)));
        };
        self.emitter.emit(instruction);
        self.advance()?;
        Ok(value_type)
    }

    pub(crate) fn declare_var(&mut self, name: char, value_type: ValueType) -> Result<String> {
        let Some(storage) = value_type.storage() else {
            let message = format!("cannot store a value of type {value_type}");
            return Err(self.error(ErrorKind::Unsupported(message)));
        };
        self.emitter.add_data(format!("_{name}: {storage}"));
        Ok(format!("[_{name}]"))
    }

    pub(crate) fn intern_string(&mut self, value: &str) -> String {
        if let Some(label) = self.strings.get(value) {
            return label.clone();
        }
        let label = self.next_label("CONST");
        debug!("interned string {value:?} as {label}");
        self.emitter
            .add_data(format!("{label}: db {}", string_bytes(value)));
        self.strings.insert(value.to_string(), label.clone());
        label
    }

    /// Label of the data declaration holding the float `value`, written as `raw`.
    pub(crate) fn intern_float(&mut self, value: f64, raw: &str) -> String {
        if let Some(label) = self.floats.get(&value.to_bits()) {
            return label.clone();
        }
        let label = self.next_label("FLOAT");
        debug!("interned float {raw} as {label}");
        self.emitter.add_data(format!("{label}: dq {raw}"));
        self.floats.insert(value.to_bits(), label.clone());
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_lines(compiler: Compiler<'_>) -> Vec<String> {
        compiler
            .emitter
            .finish()
            .into_iter()
            .skip_while(|line| line != "section .data")
            .skip(1)
            .collect()
    }

    #[test]
    fn strings_are_interned_once() {
        let mut compiler = Compiler::new("");
        let first = compiler.intern_string("hello");
        let second = compiler.intern_string("hello");
        let other = compiler.intern_string("world");
        assert_eq!(first, second);
        assert_ne!(first, other);
        let data = data_lines(compiler);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0], format!("  {first}: db 'hello', 0"));
    }

    #[test]
    fn floats_are_interned_by_value() {
        let mut compiler = Compiler::new("");
        let first = compiler.intern_float(1.5, "1.5");
        let second = compiler.intern_float(1.5, "1.50");
        assert_eq!(first, second);
        assert_ne!(first, compiler.intern_float(2.0, "2.0"));
        let data = data_lines(compiler);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0], format!("  {first}: dq 1.5"));
    }

    #[test]
    fn labels_are_unique_across_pools() {
        let mut compiler = Compiler::new("");
        let s = compiler.intern_string("1.5");
        let f = compiler.intern_float(1.5, "1.5");
        let l = compiler.next_label("else");
        assert_eq!([s.as_str(), f.as_str(), l.as_str()], ["CONST_0", "FLOAT_1", "else_2"]);
    }

    #[test]
    fn string_quoting() {
        assert_eq!(string_bytes("hi"), "'hi', 0");
        assert_eq!(string_bytes("it's"), "\"it's\", 0");
        assert_eq!(string_bytes("a'\""), "97, 39, 34, 0");
        assert_eq!(string_bytes("a\nb"), "97, 10, 98, 0");
        assert_eq!(string_bytes(""), "0");
    }

    #[test]
    fn opcode_families() {
        assert!(int_opcodes(Symbol::Eq).is_none());
        assert!(float_opcodes(Symbol::Eq).is_none());
        assert_eq!(int_opcodes(Symbol::Plus), Some(&["add EAX, EBX"][..]));
        assert_eq!(
            float_opcodes(Symbol::Lt),
            Some(&["comisd XMM1, XMM0", "setb AL"][..])
        );
    }

    #[test]
    fn unassigned_variable_still_gets_storage() {
        let mut compiler = Compiler::new("");
        assert_eq!(compiler.declare_var('i', ValueType::Int).unwrap(), "[_i]");
        assert_eq!(compiler.declare_var('a', ValueType::Float).unwrap(), "[_a]");
        assert!(compiler.declare_var('x', ValueType::None).is_err());
        assert_eq!(data_lines(compiler), ["  _i: dd 0", "  _a: dq 0.0"]);
    }
}
