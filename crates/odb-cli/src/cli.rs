use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use odb_types::ObjectType;

#[derive(Parser)]
#[command(
    name = "odb",
    about = "Content-addressed object database",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Repository metadata directory; objects live in `<git-dir>/objects`
    #[arg(long, global = true, default_value = ".git")]
    pub git_dir: PathBuf,

    /// TOML file with store settings
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
    /// Create an empty object store
    Init(InitArgs),
    /// Compute an object's address and optionally store it
    HashObject(HashObjectArgs),
    /// Print the raw payload of an object
    CatFile(CatFileArgs),
    /// Show a commit or tag's headers and message
    Show(ShowArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Create `<path>/.git/objects`; without it, `<git-dir>/objects`
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object type
    #[arg(short = 't', long = "type", default_value = "blob")]
    pub kind: ObjectType,
    /// Write the object into the store
    #[arg(short, long)]
    pub write: bool,
    /// File to read the payload from
    pub path: PathBuf,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected object type
    pub kind: ObjectType,
    /// Object address
    pub object: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub object: String,
}
