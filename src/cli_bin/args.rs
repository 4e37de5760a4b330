//! Command-line argument definitions and parsing
//!
//! This module provides the CLI argument surface using clap, with proper
//! separation between CLI concerns and library operations.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "opsmith",
    version,
    about = "A command-line tool for templating and patching YAML deployment manifests",
    long_about = "opsmith evaluates YAML deployment manifests: substitute ((name)) \
                  placeholder variables, apply declarative ops files, and read or \
                  write single values addressed by a /-separated path."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the value at a path
    Get(GetArgs),
    /// Set the value at a path
    Set(SetArgs),
    /// Substitute variables and apply ops files
    Interpolate(InterpolateArgs),
    /// Copy deployment fields from a deployment-description file
    Sync(SyncArgs),
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Manifest file to read
    pub manifest: PathBuf,

    /// Path addressing the value (e.g. /jobs/name=redis/port)
    #[arg(long)]
    pub path: String,
}

/// Arguments for the set command
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Manifest file to read
    pub manifest: PathBuf,

    /// Path addressing the value to write
    #[arg(long)]
    pub path: String,

    /// New value, parsed as YAML (numbers, lists, and maps all work)
    #[arg(long)]
    pub value: String,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the interpolate command
#[derive(Args, Debug)]
pub struct InterpolateArgs {
    /// Manifest file to evaluate
    pub manifest: PathBuf,

    /// Ops file(s), applied in the order given
    #[arg(short = 'o', long = "ops-file", value_name = "FILE")]
    pub ops_files: Vec<PathBuf>,

    /// Variable as NAME=VALUE; the value is parsed as YAML
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// YAML file mapping variable names to values
    #[arg(long = "vars-file", value_name = "FILE")]
    pub vars_files: Vec<PathBuf>,

    /// Extract this path from the interpolated manifest
    #[arg(long, conflicts_with = "in_place")]
    pub path: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Manifest file to update
    pub manifest: PathBuf,

    /// Deployment-description YAML file
    #[arg(long)]
    pub deployment: PathBuf,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Common options for write operations
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Rewrite the manifest file in place instead of printing to stdout
    #[arg(short = 'i', long)]
    pub in_place: bool,
}
