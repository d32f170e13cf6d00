//! CLI entry point for the Wedof sync.

use wedof_sync::{cli, logging};

fn main() {
    // A missing .env file is fine, the environment may already be set
    dotenv::dotenv().ok();

    let log_file = logging::log_file_from_lookup(|key| std::env::var(key).ok());
    let guard = logging::init_logging(log_file.as_deref());

    let result = cli::run();
    drop(guard);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
