//! C code emitter - builds generated C source strings
//!
//! This module provides the small text builder every fragment emitter writes through, so indentation and brace
//! placement are identical across declarations, decoders and stubs.

/// A buffer for building C source code with proper indentation
#[derive(Debug, Default)]
pub struct CEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl CEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write text without newline
    pub fn write(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a statement block: `header {` ... `}`
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a function definition with the opening brace on its own line
    pub fn function<F>(&mut self, signature: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(signature);
        self.line("{");
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a goto label at column zero
    pub fn label(&mut self, name: &str) {
        self.buffer.push_str(name);
        self.buffer.push_str(":\n");
    }

    /// Write a preprocessor directive at column zero
    pub fn directive(&mut self, text: &str) {
        self.buffer.push('#');
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn include(&mut self, header: &str) {
        self.directive(&format!("include \"{}\"", header));
    }

    /// Write a single-line comment
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("/* {} */", text));
    }

    /// Write a multi-line block comment
    pub fn block_comment(&mut self, lines: &[&str]) {
        self.line("/*");
        for l in lines {
            if l.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {}", l));
            }
        }
        self.line(" */");
    }
}

/// Join a C type and a declarator, keeping pointer stars attached to the name
///
/// `("char *", "ret")` gives `char *ret`; `("int64_t", "ret")` gives `int64_t ret`.
pub fn c_decl(c_type: &str, name: &str) -> String {
    if c_type.ends_with('*') {
        format!("{}{}", c_type, name)
    } else {
        format!("{} {}", c_type, name)
    }
}

/// Quote a string as a C string literal
pub fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_decl() {
        assert_eq!(c_decl("char *", "ret"), "char *ret");
        assert_eq!(c_decl("int64_t", "ret"), "int64_t ret");
        assert_eq!(c_decl("Error **", "errp"), "Error **errp");
    }

    #[test]
    fn test_c_string_escapes() {
        assert_eq!(c_string("ping"), "\"ping\"");
        assert_eq!(c_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_emitter_function_and_label() {
        let mut e = CEmitter::new();
        e.function("void f(void)", |e| {
            e.block("if (err)", |e| e.line("goto out;"));
            e.label("out");
            e.line("return;");
        });
        assert_eq!(
            e.finish(),
            "void f(void)\n{\n    if (err) {\n        goto out;\n    }\nout:\n    return;\n}\n"
        );
    }

    #[test]
    fn test_block_comment() {
        let mut e = CEmitter::new();
        e.block_comment(&["first", "", "second"]);
        assert_eq!(e.finish(), "/*\n * first\n *\n * second\n */\n");
    }
}
