//! Command line [`Args`].

use clap::Parser;

/// GraphQL backend of an equipment rental shop.
///
/// Serves the API over HTTP, keeping everything in PostgreSQL.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TOML file to read the configuration from.
    ///
    /// Values missing from it are taken from `RENTAL_`-prefixed environment
    /// variables, falling back to the built-in defaults.
    #[arg(
        short,
        long,
        env = "RENTAL_CONFIG",
        default_value = "config.toml",
        value_name = "PATH"
    )]
    pub config: String,
}

impl Args {
    /// Reads [`Args`] of the current process.
    ///
    /// # Errors
    ///
    /// On unknown or malformed arguments, as well as on `--help` and
    /// `--version` requests, which [`clap::Error::exit()`] handles gracefully.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
