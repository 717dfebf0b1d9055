#![forbid(unsafe_code)]

//! vibehub binary entry point.

use vibehub::cli;
use vibehub::{logging, runtime};

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = logging::init(path)
    {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = runtime::run(&opts) {
        tracing::error!(error = %e, "vibehub exited with an error");
        eprintln!("vibehub: {e}");
        std::process::exit(1);
    }
}
