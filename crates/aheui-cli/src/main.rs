//! Aheui Runtime - CLI
//!
//! Loads an assembly or bytecode program and runs it against standard
//! input and output, or converts it between the two representations.

mod cli;

use std::fs;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use aheui_core::{AheuiConfig, Machine, Program, ProgramLoader, ProgramWriter, Runtime, SourceKind};

use crate::cli::{Cli, Source, Target};

/// Initialize logging on stderr so program output stays untouched.
///
/// `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("aheui: error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let (contents, path) = read_source(&cli)?;

    let kind = match cli.source {
        Source::Auto => SourceKind::detect(path.as_deref(), &contents)?,
        Source::Asm => SourceKind::Asm,
        Source::Bytecode => SourceKind::Bytecode,
    };
    let program = ProgramLoader::load(&contents, kind)
        .with_context(|| format!("failed to load {}", display_name(path.as_deref())))?;

    match cli.target {
        Target::Run => {
            if let Some(source) = path.as_deref().filter(|p| !cli.no_c && wants_compiled_copy(p)) {
                emit_compiled(source, &program);
            }
            let stdin = io::stdin();
            let stdout = io::stdout();
            execute(program, cli.step_limit, stdin.lock(), BufWriter::new(stdout.lock()))
        }
        Target::Asm => {
            let listing = ProgramWriter::write_asm(&program);
            write_target(cli.output.as_deref(), listing.as_bytes())?;
            Ok(0)
        }
        Target::Bytecode => {
            let bytes = ProgramWriter::write_bytecode(&program)?;
            let default = path
                .filter(|p| p != Path::new("-"))
                .map(|p| compiled_path(&p));
            write_target(cli.output.as_deref().or(default.as_deref()), &bytes)?;
            Ok(0)
        }
    }
}

fn read_source(cli: &Cli) -> Result<(Vec<u8>, Option<PathBuf>)> {
    if let Some(cmd) = &cli.cmd {
        return Ok((cmd.clone().into_bytes(), None));
    }
    let path = cli.file.clone().context("no input file")?;
    let contents = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read program from stdin")?;
        buf
    } else {
        fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok((contents, Some(path)))
}

/// Run the program and report its exit code, truncated to the platform width.
fn execute<R: BufRead, W: Write>(
    program: Program,
    step_limit: Option<u64>,
    input: R,
    output: W,
) -> Result<i32> {
    let config = AheuiConfig { step_limit };
    let mut machine = Machine::new(config, program, Runtime::new(input, output));

    let result = machine.run();
    let steps = machine.steps();
    // Keep whatever was written before a fault
    machine
        .into_runtime()
        .into_output()
        .flush()
        .context("failed to flush output")?;

    let exit = result.context("runtime fault")?;
    info!(code = exit.code, steps, "program finished");
    Ok(exit.code as i32)
}

/// `foo.aheui` compiles to `foo.aheuic`; anything else gets `.aheuic` appended.
fn compiled_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    if source.extension().map_or(false, |ext| ext == "aheui") {
        name.push("c");
    } else {
        name.push(".aheuic");
    }
    PathBuf::from(name)
}

fn wants_compiled_copy(source: &Path) -> bool {
    source != Path::new("-") && source.extension().map_or(true, |ext| ext != "aheuic")
}

/// Best effort: a program that cannot be cached still runs.
fn emit_compiled(source: &Path, program: &Program) {
    let target = compiled_path(source);
    let written = ProgramWriter::write_compiled(program)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| {
            fs::write(&target, bytes).with_context(|| format!("failed to write {}", target.display()))
        });
    match written {
        Ok(()) => debug!(path = %target.display(), "wrote compiled program"),
        Err(e) => warn!("skipping compiled copy: {:#}", e),
    }
}

fn write_target(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn display_name(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "--cmd program".to_string(),
    }
}
