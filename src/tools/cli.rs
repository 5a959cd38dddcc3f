use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, LevelFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Define the two output channels
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A canonical Huffman file compressor",
    long_about = "
    Counts the bytes of the input, builds a Huffman tree from the counts and writes
    the tree followed by the re-encoded input. The output of FILE goes to FILE.huff
    unless another path or standard out is requested. With no FILE, standard input
    is compressed to standard out."
)]
pub struct HuffOpts {
    /// Filename of file to process
    #[clap()]
    pub file: Option<String>,

    /// Write the compressed stream here instead of FILE.huff
    #[clap(short = 'o', long = "output")]
    pub out_file: Option<String>,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Print the Huffman tree in preorder instead of compressing
    #[clap(short = 't', long = "tree")]
    pub print_tree: bool,

    /// Sets verbosity. -v shows a summary, -vvv is chatty
    #[clap(short = 'v', parse(from_occurrences))]
    pub verbose: u64,

    /// Suppress all log output
    #[clap(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl HuffOpts {
    /// Where the compressed stream goes.
    pub fn output(&self) -> Output {
        if self.stdout || (self.file.is_none() && self.out_file.is_none()) {
            Output::Stdout
        } else {
            Output::File
        }
    }

    /// Output file path, or None when writing to standard out.
    pub fn target_path(&self) -> Option<String> {
        match self.output() {
            Output::Stdout => None,
            Output::File => self
                .out_file
                .clone()
                .or_else(|| self.file.as_ref().map(|f| format!("{}.huff", f))),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Parse the command line and set the log level from it.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::parse();
    log::set_max_level(opts.log_level());

    // Below we report initialization status to the user
    info!("---- Huffpack Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    match &opts.file {
        Some(s) => info!("Getting input from the file {}", s),
        None => info!("Getting input from stdin"),
    }
    match opts.target_path() {
        Some(s) => info!("Sending output to the file {}", s),
        None => info!("Sending output to {}", opts.output()),
    }
    if opts.force {
        info!("Forcing file overwriting")
    };
    info!("---- Huffpack Initialization End ----\n");
    opts
}
