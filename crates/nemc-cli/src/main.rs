//! # nemc
//!
//! This binary is the command-line driver for the nemesis compiler and
//! package manager. It combines the package manager (`nemc-pm`) and the
//! compiler front end (`nemc-core`) into a single application.

mod cli;
mod commands;

use cli::*;

fn main() -> std::process::ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level(args.verbosity.into()).unwrap();

    let result = match args.command {
        Commands::Init(args) => commands::init::run(args).map(|_| 0),
        Commands::Add(args) => commands::add::run(args).map(|_| 0),
        Commands::Remove(args) => commands::remove::run(args).map(|_| 0),
        Commands::Build(args) => commands::build::run(args).map(|ok| if ok { 0 } else { 1 }),
        Commands::Clean => commands::clean::run().map(|_| 0),
        Commands::Run(args) => commands::run::run(args),
        Commands::Test(args) => commands::test::run(args).map(|ok| if ok { 0 } else { 1 }),
    };

    match result {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(error) => {
            log::error!("{error:#}");
            std::process::ExitCode::from(1)
        }
    }
}
