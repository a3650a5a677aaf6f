use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mcpetool",
    about = "Inspect and edit Minecraft Pocket Edition world databases",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the worlds HTTP API
    #[command(visible_alias = "www")]
    Api(ApiArgs),
    /// List every key in the world database as hex
    #[command(visible_alias = "k")]
    Keys(WorldArgs),
    /// Print the value of a key as base64
    Get(GetArgs),
    /// Set a key to the base64 value read from stdin
    Put(KeyArgs),
    /// Remove a key
    Delete(KeyArgs),
    /// Print store diagnostics
    #[command(visible_alias = "dev")]
    Develop(WorldArgs),
}

#[derive(Args)]
pub struct WorldArgs {
    /// Path to the world directory
    pub world: PathBuf,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Path to the world directory
    pub world: PathBuf,
    /// Key as hex
    pub key: String,
}

#[derive(Args)]
pub struct GetArgs {
    /// Path to the world directory
    pub world: PathBuf,
    /// Key as hex
    pub key: String,
    /// Print a hexdump instead of base64
    #[arg(short, long)]
    pub dump: bool,
}

#[derive(Args)]
pub struct ApiArgs {
    /// Path to the world directory
    pub world: PathBuf,
    /// Address to listen on [default: 127.0.0.1:8080]
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory listed by the API [default: parent of the world]
    #[arg(long)]
    pub worlds_root: Option<PathBuf>,
    /// URL prefix the API is served under [default: /api/v1/worlds/]
    #[arg(long)]
    pub mount: Option<String>,
    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}
