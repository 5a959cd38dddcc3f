//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huffpack::compression::compress::compress;
use huffpack::error::HuffError;
use huffpack::tools::cli::huffopts_init;

use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() {
    if let Err(e) = run() {
        eprintln!("huffpack: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), HuffError> {
    // Available log levels are Error, Warn, Info, Debug, Trace. Logs go to stderr so they
    // never mix with a compressed stream on stdout.
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let options = huffopts_init();
    compress(&options)?;

    info!("Done.\n");
    Ok(())
}
