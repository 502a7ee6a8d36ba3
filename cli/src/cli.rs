use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "illustraia", about = "Turn a prompt into an illustration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Generate one illustration and print its URL
    Generate(Generate),
    /// List the built-in art styles
    Styles,
}

#[derive(Debug, clap::Args)]
pub struct Generate {
    /// What the image should show
    pub prompt: String,

    /// One of the built-in styles, or any free text used as the style descriptor
    #[arg(short, long, default_value = "Cozy")]
    pub style: String,

    /// Leonardo API key
    #[arg(long, env = "LEONARDO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Generator settings in RON. Defaults to illustraia.ron in the local config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
