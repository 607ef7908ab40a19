use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use nemc_core::checker::TypeChecker;
use nemc_core::codegen;
use nemc_core::lexer::Lexer;
use nemc_core::{grammar, parser};
use nemc_pm::Manifest;

use crate::cli::BuildArgs;

/// Locates the package's single compilation unit under `src/`.
///
/// The original loader resolves a full module graph from `import`
/// statements; that multi-file resolution is not yet wired up here, so a
/// single `src/main.ns` (or the first `.ns` file found) is compiled as the
/// whole program.
fn entry_point(manifest: &Manifest) -> Result<PathBuf> {
    let preferred = Path::new("src/main.ns");
    if preferred.exists() {
        return Ok(preferred.to_path_buf());
    }
    for entry in std::fs::read_dir("src").context("reading src/ directory")? {
        let entry = entry?;
        if entry.path().extension().is_some_and(|ext| ext == "ns") {
            return Ok(entry.path());
        }
    }
    anyhow::bail!("no `.ns` source file found for package `{}`", manifest.name)
}

/// Lexes, parses, checks, validates, generates and compiles the package's
/// entry point. Returns the produced binary's path, or `None` on any
/// recoverable failure (lexical, syntactic, semantic, or downstream
/// compiler) — the caller maps that to exit code 1.
///
/// `test_mode` selects the test-driver trailer (every `test_`-prefixed
/// top-level function called from a synthesised driver) over the normal
/// entry-point trampoline, and places the build under a separate cache
/// subdirectory so a `test` run never clobbers a prior `build`'s artifacts.
pub fn compile(args: &BuildArgs, test_mode: bool) -> Result<Option<PathBuf>> {
    let manifest = Manifest::parse_file(Manifest::FILE_NAME)
        .context("reading nemesis.manifest (run `nemc init` first)")?;
    let entry = entry_point(&manifest)?;
    let source = std::fs::read_to_string(&entry)?;

    if args.trace {
        log::trace!("compiling {}", entry.display());
    }

    if args.tokens {
        match Lexer::new(&source).lex() {
            Ok(tokens) => println!("{tokens:#?}"),
            Err(err) => {
                eprintln!("{err}");
                return Ok(None);
            }
        }
    }

    let program = match grammar::parse(&source) {
        Ok(program) => program,
        Err(errors) => {
            for error in errors {
                eprintln!("{error:?}");
            }
            return Ok(None);
        }
    };

    let statements = parser::parse_program(program, &source);
    if args.ast {
        println!("{statements:#?}");
    }

    if args.trace {
        log::trace!("running type checker");
    }

    let checker = TypeChecker::new(statements);
    let checked = match checker.check() {
        Ok(checked) => checked,
        Err(error) => {
            eprintln!("{error}");
            return Ok(None);
        }
    };

    let validated = match TypeChecker::validate(checked) {
        Ok(validated) => validated,
        Err(error) => {
            eprintln!("{error:?}");
            return Ok(None);
        }
    };

    if args.trace {
        log::trace!("running code generator (test_mode={test_mode})");
    }

    let generated = codegen::emit(&validated, test_mode);

    let build_dir = PathBuf::from(".cache").join(if test_mode { "test" } else { "build" });
    std::fs::create_dir_all(&build_dir).context("creating build cache directory")?;

    let source_path = build_dir.join(format!("{}.cpp", manifest.name));
    std::fs::write(&source_path, &generated.source)
        .with_context(|| format!("writing {}", source_path.display()))?;

    let header_path = build_dir.join(codegen::RUNTIME_HEADER_FILE_NAME);
    std::fs::write(&header_path, codegen::RUNTIME_HEADER)
        .with_context(|| format!("writing {}", header_path.display()))?;

    let runtime_source_path = build_dir.join(codegen::RUNTIME_SOURCE_FILE_NAME);
    std::fs::write(&runtime_source_path, codegen::RUNTIME_SOURCE)
        .with_context(|| format!("writing {}", runtime_source_path.display()))?;

    let binary_path = if test_mode {
        build_dir.join("test-runner")
    } else {
        PathBuf::from("application")
    };

    let compiler = std::env::var("CXX").unwrap_or_else(|_| "c++".to_string());
    let status = Command::new(&compiler)
        .arg("-std=c++20")
        .arg("-I")
        .arg(&build_dir)
        .arg(&source_path)
        .arg(&runtime_source_path)
        .arg("-o")
        .arg(&binary_path)
        .status()
        .with_context(|| format!("invoking downstream compiler `{compiler}`"))?;

    if !status.success() {
        log::error!("downstream compiler exited with {status}");
        return Ok(None);
    }

    log::info!("build succeeded: {}", binary_path.display());
    Ok(Some(binary_path))
}

/// Returns `Ok(true)` if the build succeeded, `Ok(false)` on a recoverable
/// compilation failure (caller should exit with code 1).
pub fn run(args: BuildArgs) -> Result<bool> {
    Ok(compile(&args, false)?.is_some())
}
