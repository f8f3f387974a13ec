use clap::Parser;
use esh::cli::ShellArgs;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(args: &ShellArgs) {
    let filter = args
        .log_level
        .clone()
        .or_else(|| env::var("ESH_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = ShellArgs::parse();
    init_logging(&args);

    match esh::run_shell(&args) {
        Ok(end) => ExitCode::from(end.exit_code()),
        Err(e) => {
            eprintln!("esh: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
