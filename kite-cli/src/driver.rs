//! Build driver: hand the serialized module to the backend toolchain.
//!
//! The driver owns the last stage of the pipeline. It derives an
//! output base name from the input file, writes the textual IR next
//! to the working directory, then shells out synchronously: once to
//! lower IR to assembly, once to assemble and link. A failing step
//! aborts the rest; intermediate files that were already produced are
//! left in place for inspection.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

/// External tools the driver invokes. Both accept `<input> -o <output>`.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// IR-to-assembly compiler, `llc` by default.
    pub llc: String,
    /// Assembler/linker driver, `cc` by default.
    pub cc: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain {
            llc: "llc".to_string(),
            cc: "cc".to_string(),
        }
    }
}

/// How far to take the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Stop after writing the `.ll` file.
    Ir,
    /// Stop after the assembly file.
    Asm,
    /// Produce the linked executable.
    Exe,
}

/// Run the backend pipeline for `ir_text`, derived from `input`. The
/// artifacts (`<base>.ll`, `<base>.s`, `<base>`) land in the working
/// directory.
pub fn build(ir_text: &str, input: &Path, toolchain: &Toolchain, emit: Emit) -> Result<()> {
    let base = output_base(input)?;

    let ir_path = PathBuf::from(format!("{base}.ll"));
    fs::write(&ir_path, ir_text)
        .with_context(|| format!("failed to write IR file '{}'", ir_path.display()))?;
    if emit == Emit::Ir {
        return Ok(());
    }

    let asm_path = PathBuf::from(format!("{base}.s"));
    run_tool(&toolchain.llc, &ir_path, &asm_path)?;
    if emit == Emit::Asm {
        return Ok(());
    }

    run_tool(&toolchain.cc, &asm_path, &PathBuf::from(base))?;
    Ok(())
}

/// Input file name without directory and without its final extension.
fn output_base(input: &Path) -> Result<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive an output name from '{}'", input.display()))
}

fn run_tool(tool: &str, input: &Path, output: &Path) -> Result<()> {
    let status = Command::new(tool)
        .arg(input)
        .arg("-o")
        .arg(output)
        .status()
        .with_context(|| format!("failed to run '{tool}'"))?;
    if !status.success() {
        bail!("'{tool}' exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_base_from_file_name_only() {
        assert_eq!(output_base(Path::new("hello.kite")).unwrap(), "hello");
        assert_eq!(output_base(Path::new("dir/sub/prog.kite")).unwrap(), "prog");
        // Only the final extension is stripped.
        assert_eq!(output_base(Path::new("a.b.kite")).unwrap(), "a.b");
        // No extension at all is fine too.
        assert_eq!(output_base(Path::new("plain")).unwrap(), "plain");
    }
}
