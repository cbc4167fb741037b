use twitdl_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // File logging under the state dir; stderr if that is not writable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = Cli::run_from_args().await {
        eprintln!("twitdl error: {:#}", err);
        std::process::exit(1);
    }
}
