use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method of the request
    #[arg(default_value = "GET", long, short = 'X')]
    pub method: String,

    /// Absolute URL of the request
    #[arg(long, short)]
    pub url: String,

    /// Header of the request, formatted as "name: value"
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// File to read the request body from
    #[arg(long, short)]
    pub body: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// The authorization parameter string to parse, without the scheme
    pub parameters: String,
}

#[derive(Args)]
pub struct SignArgs {
    /// Path to the signing configuration
    #[arg(long, short)]
    pub config: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Path to the verification configuration
    #[arg(long, short)]
    pub config: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Parse an authorization parameter string and report any format errors
    Parse(ParseArgs),

    /// Sign a request and print the headers added to it
    Sign(SignArgs),

    /// Verify a signed request
    Verify(VerifyArgs),
}

/// Sign and verify HTTP requests
#[derive(Parser)]
#[command(about, version)]
pub struct ToolArgs {
    #[clap(subcommand)]
    pub subcommand: ToolSubcommand,
}
