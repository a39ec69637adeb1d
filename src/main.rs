//! CLI entry point for the photo mosaic generator

use clap::Parser;
use photomosaic::io::cli::Cli;
use photomosaic::io::logging::init_logging;

fn main() -> photomosaic::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli.run().map(|_| ())
}
