use indexmap::IndexSet;

/// Accumulates the text section line by line and the data section as a set.
#[derive(Debug, Default)]
pub struct Emitter {
    code: Vec<String>,
    data: IndexSet<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line written flush-left, such as a directive.
    pub fn emit0(&mut self, line: impl Into<String>) {
        self.code.push(line.into());
    }

    pub fn emit(&mut self, instruction: impl AsRef<str>) {
        self.code.push(format!("  {}", instruction.as_ref()));
    }

    pub fn label(&mut self, label: &str) {
        self.code.push(format!("{label}:"));
    }

    /// Records a data declaration. Returns false if an identical line was already present.
    pub fn add_data(&mut self, entry: impl Into<String>) -> bool {
        self.data.insert(entry.into())
    }

    pub fn prologue(&mut self) {
        self.emit0("global main");
        self.emit0("section .text");
        self.emit0("main:");
    }

    pub fn epilogue(&mut self) {
        self.emit("extern exit");
        self.emit("call exit");
    }

    pub fn finish(mut self) -> Vec<String> {
        if !self.data.is_empty() {
            self.code.push("section .data".to_string());
            for entry in self.data {
                self.code.push(format!("  {entry}"));
            }
        }
        self.code
    }
}
