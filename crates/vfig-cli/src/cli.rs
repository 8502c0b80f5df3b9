use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vfig_bundle::LayoutKind;

#[derive(Parser)]
#[command(
    name = "vfig",
    about = "Create, inspect and upgrade virtual figure bundles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List series, or the figures of one series, from a catalog file
    Catalog(CatalogArgs),
    /// Write one bundle for a catalog figure
    Generate(GenerateArgs),
    /// Write bundles for every figure of a series
    GenerateSeries(GenerateSeriesArgs),
    /// Write bundles for the whole catalog, one directory per series
    GenerateAll(GenerateAllArgs),
    /// Read a bundle in any layout and show its contents
    Inspect(InspectArgs),
    /// Rename a current-layout bundle, keeping its mii data and other files
    Rename(RenameArgs),
    /// Convert a legacy bundle into a current one
    Upgrade(UpgradeArgs),
}

/// Output settings shared by the generate commands.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Directory bundles are written under
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub layout: Option<LayoutKind>,
    /// Let consumers draw a fresh uuid at runtime
    #[arg(long)]
    pub random_uuid: bool,
}

#[derive(Args)]
pub struct CatalogArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub series: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    pub catalog: PathBuf,
    #[arg(long)]
    pub series: String,
    /// Catalog name of the figure
    #[arg(long)]
    pub name: String,
    /// Name stored in the bundle (defaults to a short form of --name)
    #[arg(long)]
    pub figure_name: Option<String>,
    /// Bundle directory name (defaults to --name)
    #[arg(long)]
    pub dir: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct GenerateSeriesArgs {
    pub catalog: PathBuf,
    #[arg(long)]
    pub series: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct GenerateAllArgs {
    pub catalog: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct InspectArgs {
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct RenameArgs {
    pub dir: PathBuf,
    pub name: String,
    /// Set or clear the random-uuid flag
    #[arg(long)]
    pub random_uuid: Option<bool>,
}

#[derive(Args)]
pub struct UpgradeArgs {
    pub src: PathBuf,
    pub dst: PathBuf,
}
