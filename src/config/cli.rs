use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "teamform")]
#[command(about = "Forms bounded-size teams from a participant snapshot")]
pub struct CliArgs {
    /// Path to the participant snapshot (JSON).
    #[arg(long)]
    pub input: String,

    /// Optional TOML file overriding formation parameters.
    #[arg(long)]
    pub config: Option<String>,

    /// Write the outcome JSON here instead of stdout.
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}
