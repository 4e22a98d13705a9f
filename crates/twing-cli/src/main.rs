use clap::Parser;
use twing_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging before any command runs.
    if cli.log_file {
        if let Err(err) = logging::init_logging_file() {
            eprintln!("twing: file logging unavailable ({:#}), logging to stderr", err);
            logging::init_logging_stderr();
        }
    } else {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli.run().await {
        eprintln!("twing error: {:#}", err);
        std::process::exit(1);
    }
}
