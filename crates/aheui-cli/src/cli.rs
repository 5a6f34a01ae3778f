use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Run Aheui assembly and bytecode programs
#[derive(Parser, Debug)]
#[command(name = "aheui")]
#[command(version)]
pub struct Cli {
    /// Program file; `-` reads standard input
    #[arg(required_unless_present = "cmd", conflicts_with = "cmd")]
    pub file: Option<PathBuf>,

    /// Program passed in as a string
    #[arg(short = 'c', long)]
    pub cmd: Option<String>,

    /// Source representation
    #[arg(short = 'S', long, value_enum, default_value_t = Source::Auto)]
    pub source: Source,

    /// What to do with the loaded program
    #[arg(short = 'T', long, value_enum, default_value_t = Target::Run)]
    pub target: Target,

    /// Output file for the `asm` and `bytecode` targets; `-` is standard output.
    ///
    /// Defaults to standard output for `asm` and to `<file>.aheuic` for
    /// `bytecode`. Ignored by `run`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write `<file>.aheuic` next to a program before running it
    #[arg(long = "no-c")]
    pub no_c: bool,

    /// Abort after executing this many instructions
    #[arg(long, env = "AHEUI_STEP_LIMIT")]
    pub step_limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Guess from the file extension, then the contents
    Auto,
    Asm,
    Bytecode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Run,
    Asm,
    Bytecode,
}
