//! CLI entry point for the block mosaic rebuilder

use blockmosaic::io::cli::{Cli, MosaicProcessor};
use clap::Parser;

fn main() -> blockmosaic::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    MosaicProcessor::new(cli).process().map(|_| ())
}
