use choco::{default_script, run_file, start_repl, EvalConfig, RunOptions};
use clap::{value_parser, Arg, ArgAction, Command};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Logging stays off unless `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let matches = Command::new("choco")
        .about("A tree-walking interpreter with closures, arrays and hashes")
        .arg(
            Arg::new("file")
                .help("The script file to execute (defaults to ./main.choco when present)")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum nesting of function calls")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .help("Render errors as annotated source snippets on stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut eval = EvalConfig::default();
    if let Some(&depth) = matches.get_one::<usize>("max-depth") {
        eval.max_call_depth = depth;
    }

    // Without FILE, ./main.choco is run if present; otherwise the REPL starts.
    let script = if matches.get_flag("interactive") {
        None
    } else {
        matches
            .get_one::<PathBuf>("file")
            .cloned()
            .or_else(|| default_script(Path::new(".")))
    };

    let result = match script {
        Some(path) => {
            let options = RunOptions {
                eval,
                diagnostics: matches.get_flag("diagnostics"),
            };
            run_file(&path, &mut io::stdout().lock(), &options)
        }
        None => start_repl(io::stdin().lock(), io::stdout(), eval).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
