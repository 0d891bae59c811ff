//! Top-level compile loop: parse one primary at a time, lower it,
//! keep going.
//!
//! Per-statement syntax and lowering failures are collected as
//! diagnostics and never abort the loop; recovery skips exactly one
//! token and resumes at the top level. This terminates on any input:
//! every iteration either consumes at least one token or bumps once,
//! and bumping at end of input leaves the loop condition false.

use crate::codegen;
use crate::diagnostic::Diagnostic;
use crate::ir::Module;
use crate::parser::Parser;

/// The finished module plus everything reported along the way.
#[derive(Debug)]
pub struct CompileOutput {
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Serialized textual IR for the backend toolchain.
    pub fn ir(&self) -> String {
        self.module.to_ir()
    }
}

/// Compile `source` into an IR module named `module_name`, recording
/// `source_file` in the module header.
pub fn compile(source: &str, module_name: &str, source_file: &str) -> CompileOutput {
    let mut parser = Parser::new(source);
    let mut module = Module::new(module_name, source_file);
    let mut diagnostics = Vec::new();

    while !parser.at_eof() {
        let statement_start = parser.offset();
        match parser.parse_primary() {
            Ok(node) => {
                if let Err(err) = codegen::lower(&node, &mut module) {
                    diagnostics.push(Diagnostic::from_error(&err, statement_start));
                }
            }
            Err(err) => {
                diagnostics.push(Diagnostic::from_error(&err, statement_start));
                parser.bump();
            }
        }
    }

    CompileOutput {
        module,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_hello_world_without_diagnostics() {
        let source = "extern printf\nprintf(\"hello %d\", 5)\n";
        let output = compile(source, "hello", "hello.kite");
        assert!(!output.has_errors(), "diagnostics: {:?}", output.diagnostics);

        let ir = output.ir();
        assert!(ir.contains("declare i32 @printf(ptr, ...)"));
        assert!(ir.contains("c\"hello %d\\00\""));
        assert!(ir.contains("call i32 (ptr, ...) @printf(ptr %0, i32 5)"));
        assert!(ir.contains("define i32 @main()"));
    }

    #[test]
    fn empty_and_comment_only_sources_produce_an_empty_entry() {
        for source in ["", "   \n\t", "# just a comment\n# and another"] {
            let output = compile(source, "m", "m.kite");
            assert!(!output.has_errors());
            assert!(output.ir().contains("define i32 @main() {\nentry:\n  ret i32 0\n}"));
        }
    }

    #[test]
    fn recovers_after_a_malformed_statement() {
        // `foo(1, 2` never closes; the parser trips on `bar`, recovery
        // skips that one token, and the rest of the file compiles.
        let source = "foo(1, 2\nbar\nextern printf\nprintf(\"ok\")\n";
        let output = compile(source, "m", "m.kite");

        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].message.contains("expected ',' or ')'"));

        let ir = output.ir();
        assert!(ir.contains("declare i32 @printf(ptr, ...)"));
        assert!(ir.contains("c\"ok\\00\""));
    }

    #[test]
    fn garbage_only_input_terminates_with_diagnostics() {
        let output = compile(") , )", "m", "m.kite");
        assert_eq!(output.diagnostics.len(), 3);
    }

    #[test]
    fn lowering_errors_do_not_stop_later_statements() {
        let source = "nowhere\nextern printf\nprintf(\"still here\")\n";
        let output = compile(source, "m", "m.kite");

        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].message.contains("undefined symbol"));
        assert!(output.ir().contains("c\"still here\\00\""));
    }

    #[test]
    fn statements_lower_in_source_order() {
        let source = "printf(\"a\")\nprintf(\"b\")\n";
        let output = compile(source, "m", "m.kite");
        let ir = output.ir();
        let first = ir.find("c\"a\\00\"").expect("first literal");
        let second = ir.find("c\"b\\00\"").expect("second literal");
        assert!(first < second);
    }
}
