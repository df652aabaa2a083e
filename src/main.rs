use std::{fs::read_to_string, path::PathBuf, process::ExitCode};

use clap::Parser;
use scriptling::{
    display_error,
    interpreter::interpreter::{Interpreter, InterpreterConfig, DEFAULT_MAX_CALL_DEPTH},
    runtime::{environment::ConsoleEnvironment, value::Value},
};
use tracing_subscriber::{filter::Directive, EnvFilter};

#[derive(Parser)]
#[command(name = "scriptling")]
#[command(about = "Type-check and run scriptling programs")]
struct Cli {
    /// Program to run
    file: PathBuf,

    /// Stop after semantic analysis
    #[arg(long)]
    check: bool,

    /// Nested function calls allowed before the program is aborted
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Log pipeline phases to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let directive = if cli.verbose { "scriptling=debug" } else { "scriptling=warn" };
    let filter = match directive.parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", cli.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let interpreter = Interpreter::new(InterpreterConfig {
        max_call_depth: cli.max_call_depth,
        file_name,
    });

    let result = if cli.check {
        interpreter.check(&source).map(|_| Value::Void)
    } else {
        interpreter.run(&source, &mut ConsoleEnvironment::stdio())
    };

    match result {
        Ok(Value::Void) => ExitCode::SUCCESS,
        Ok(value) => {
            tracing::info!(%value, "program returned");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprint!("{}", display_error(&error, &source));
            ExitCode::FAILURE
        }
    }
}
