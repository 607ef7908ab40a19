//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for
//! the nemesis compiler driver.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Struct containing the CLI configuration for the driver.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the driver.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings (like unused variables).
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the compiler, e.g.,
    /// which files are compiled.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the compiler.
    #[value(alias("3"))]
    Debug,

    /// Log extra information, including non-fatal internal diagnostics.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new package in the current (or a named) directory.
    Init(InitArgs),

    /// Add a dependency to the package manifest.
    Add(AddArgs),

    /// Remove a dependency from the package manifest.
    Remove(RemoveArgs),

    /// Resolve dependencies and build the package.
    Build(BuildArgs),

    /// Remove build artifacts and the dependency cache.
    Clean,

    /// Build (if necessary) and run the package's executable.
    Run(RunArgs),

    /// Build and run the package's tests.
    Test(TestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Directory to initialise; defaults to the current directory.
    #[arg(index = 1, default_value = ".")]
    pub path: std::path::PathBuf,

    /// Initialise a library instead of an application.
    #[arg(long)]
    pub lib: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name of the dependency to add.
    #[arg(index = 1)]
    pub name: String,

    /// Version constraint; defaults to the latest available.
    #[arg(index = 2)]
    pub version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Name of the dependency to remove.
    #[arg(index = 1)]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Whether to dump the raw token stream (for debugging).
    #[arg(long)]
    pub tokens: bool,

    /// Whether to dump the parsed AST (for debugging).
    #[arg(long)]
    pub ast: bool,

    /// Whether to log a trace of each compilation stage as it runs.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Arguments forwarded to the built executable.
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TestArgs {
    #[command(flatten)]
    pub build: BuildArgs,
}
