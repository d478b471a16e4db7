//! Command-line arguments and configuration resolution.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::{eyre, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WALLETSTORE_DATA_DIR";

/// Manage the wallet credential stored on this machine.
#[derive(Debug, Parser)]
#[command(name = "walletstore", version, about)]
pub struct Cli {
    /// Directory holding the store's files.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations on the current wallet slot.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a credential, replacing the stored one.
    Save(SaveArgs),
    /// Print the stored credential.
    Load {
        /// Print the private key instead of its length.
        #[arg(long)]
        reveal: bool,
    },
    /// Delete the stored credential.
    Delete,
    /// Report whether the slot is empty, present or unreadable.
    Status,
}

/// Arguments of `save`.
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Public wallet address.
    #[arg(long)]
    pub address: String,

    #[command(flatten)]
    pub key: KeySource,
}

/// Where the private key comes from. Exactly one must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct KeySource {
    /// Private key on the command line (visible in shell history).
    #[arg(long)]
    pub private_key: Option<String>,

    /// Read the private key from standard input.
    #[arg(long)]
    pub private_key_stdin: bool,

    /// Save a degraded record without a private key.
    #[arg(long)]
    pub address_only: bool,
}

/// Resolves the data directory: flag or environment first, then the
/// platform's local data directory.
///
/// # Errors
///
/// Returns an error if no directory is configured and the platform has no
/// local data directory.
pub fn resolve_data_dir(configured: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        return Ok(dir);
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("walletstore"))
        .ok_or_else(|| eyre!("no local data directory; pass --data-dir or set {DATA_DIR_ENV}"))
}
