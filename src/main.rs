// src/main.rs

use std::process::ExitCode;

use runall::{cli, logging, run};

// Return instead of `process::exit`: runtime shutdown drops units still in
// flight, and with them their child processes.
#[tokio::main]
async fn main() -> ExitCode {
    match run_main().await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("runall error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
