#[macro_use]
extern crate tracing;

use self::args::{ToolArgs, ToolSubcommand};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod parse;
mod sign;
mod util;
mod verify;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = ToolArgs::parse();
    match args.subcommand {
        ToolSubcommand::Parse(args) => parse::do_it(&args.parameters),
        ToolSubcommand::Sign(args) => sign::do_it(args).await,
        ToolSubcommand::Verify(args) => verify::do_it(args).await,
    }
}
