//! Binary for aagord

#![warn(missing_docs)]

use aagord::cmd::Cli;
use clap::Parser;

#[doc(hidden)]
fn main() {
    let cli = Cli::parse();
    std::process::exit(cli.run());
}
