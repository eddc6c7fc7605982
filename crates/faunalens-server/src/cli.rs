use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "faunalens")]
#[command(author, version, about = "Animal photo classification service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the classification server
    Serve(ServeArgs),

    /// Upload a photo to a running server and print the report
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "faunalens.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Inference API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Inference API key
    #[arg(long, env = "GOOGLE_GENERATIVE_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Inference timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Image file (JPG, PNG, WEBP; max 10MB)
    pub file: PathBuf,

    /// Server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Print the raw JSON result instead of the report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
