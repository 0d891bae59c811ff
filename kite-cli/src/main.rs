//! Command-line entry point for the Kite compiler.

mod driver;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use kite_core::compile;

use crate::driver::{Emit, Toolchain};

#[derive(Parser, Debug)]
#[command(version, about = "Compile a Kite source file to a native executable", long_about = None)]
struct Cli {
    /// Path to the Kite source file.
    input: PathBuf,

    #[arg(
        long,
        value_name = "STAGE",
        default_value = "exe",
        help = "How far to take the build: ll, asm, exe"
    )]
    emit: String,

    #[arg(
        long,
        value_name = "TOOL",
        default_value = "llc",
        help = "IR-to-assembly tool to invoke"
    )]
    llc: String,

    #[arg(
        long,
        value_name = "TOOL",
        default_value = "cc",
        help = "Assembler/linker driver to invoke"
    )]
    cc: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let emit = match cli.emit.as_str() {
        "ll" => Emit::Ir,
        "asm" => Emit::Asm,
        "exe" => Emit::Exe,
        other => bail!("unsupported emit stage: {other}"),
    };

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;

    let module_name = cli
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("module")
        .to_string();
    let source_file = cli
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("input.kite")
        .to_string();

    let output = compile(&source, &module_name, &source_file);

    // Per-statement problems are reported but do not stop the build;
    // the module carries whatever did compile.
    for diagnostic in &output.diagnostics {
        eprintln!("{}:{}: {diagnostic}", cli.input.display(), diagnostic.offset);
    }

    let toolchain = Toolchain {
        llc: cli.llc,
        cc: cli.cc,
    };
    driver::build(&output.ir(), &cli.input, &toolchain, emit)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::tempdir;

    const HELLO: &str = "extern printf\nprintf(\"hello %d\", 5)\n";

    fn kite_cli() -> Command {
        Command::cargo_bin("kite-cli").expect("binary exists")
    }

    #[cfg(unix)]
    fn write_stub_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, script).expect("write stub tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub tool");
        path
    }

    #[test]
    fn emits_ir_without_invoking_tools() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("hello.kite"), HELLO).expect("write input");

        kite_cli()
            .current_dir(dir.path())
            .arg("hello.kite")
            .arg("--emit")
            .arg("ll")
            .assert()
            .success();

        let ir = fs::read_to_string(dir.path().join("hello.ll")).expect("read ir");
        assert!(ir.contains("declare i32 @printf(ptr, ...)"));
        assert!(ir.contains("define i32 @main()"));
    }

    #[cfg(unix)]
    #[test]
    fn produces_all_three_artifacts_in_sequence() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("hello.kite"), HELLO).expect("write input");
        let llc = write_stub_tool(dir.path(), "fake-llc", "#!/bin/sh\ncp \"$1\" \"$3\"\n");
        let cc = write_stub_tool(dir.path(), "fake-cc", "#!/bin/sh\n: > \"$3\"\n");

        kite_cli()
            .current_dir(dir.path())
            .arg("hello.kite")
            .arg("--llc")
            .arg(&llc)
            .arg("--cc")
            .arg(&cc)
            .assert()
            .success();

        assert!(dir.path().join("hello.ll").exists());
        assert!(dir.path().join("hello.s").exists());
        assert!(dir.path().join("hello").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_backend_aborts_the_remaining_steps() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("hello.kite"), HELLO).expect("write input");
        let llc = write_stub_tool(dir.path(), "fake-llc", "#!/bin/sh\nexit 1\n");
        let cc = write_stub_tool(dir.path(), "fake-cc", "#!/bin/sh\n: > \"$3\"\n");

        kite_cli()
            .current_dir(dir.path())
            .arg("hello.kite")
            .arg("--llc")
            .arg(&llc)
            .arg("--cc")
            .arg(&cc)
            .assert()
            .failure()
            .stderr(predicate::str::contains("exited with"));

        // The IR file was already written and is kept; nothing after
        // the failing step was produced.
        assert!(dir.path().join("hello.ll").exists());
        assert!(!dir.path().join("hello.s").exists());
        assert!(!dir.path().join("hello").exists());
    }

    #[test]
    fn diagnostics_go_to_stderr_without_failing_the_build() {
        let dir = tempdir().expect("tempdir");
        let source = "foo(1, 2\nbar\nextern printf\nprintf(\"ok\")\n";
        fs::write(dir.path().join("broken.kite"), source).expect("write input");

        kite_cli()
            .current_dir(dir.path())
            .arg("broken.kite")
            .arg("--emit")
            .arg("ll")
            .assert()
            .success()
            .stderr(predicate::str::contains("expected ',' or ')'"));

        let ir = fs::read_to_string(dir.path().join("broken.ll")).expect("read ir");
        assert!(ir.contains("c\"ok\\00\""));
    }

    #[test]
    fn reports_missing_input_file() {
        let dir = tempdir().expect("tempdir");
        kite_cli()
            .current_dir(dir.path())
            .arg("no-such-file.kite")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read input file"));
    }

    #[test]
    fn requires_an_input_argument() {
        kite_cli().assert().failure();
    }

    #[test]
    fn rejects_unknown_emit_stage() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("hello.kite"), HELLO).expect("write input");

        kite_cli()
            .current_dir(dir.path())
            .arg("hello.kite")
            .arg("--emit")
            .arg("wasm")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported emit stage"));
    }
}
