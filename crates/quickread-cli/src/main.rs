//! quickread CLI — timed speed reading in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quickread", version, about = "Speed reading with a comprehension quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the text to read comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Text to read
    #[arg(long)]
    text: Option<String>,

    /// File containing the text to read
    #[arg(long)]
    file: Option<PathBuf>,

    /// Topic of a built-in paragraph (e.g. "fotossíntese")
    #[arg(long)]
    topic: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a text word by word, then answer the quiz
    Read {
        #[command(flatten)]
        source: Source,

        /// Reading speed in words per minute
        #[arg(long)]
        speed: Option<u32>,

        /// Option chosen for each question (comma-separated, default: 0)
        #[arg(long)]
        answers: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter quickread.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quickread=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Read {
            source,
            speed,
            answers,
            format,
            config,
        } => {
            let source = if let Some(text) = source.text {
                commands::read::TextSource::Inline(text)
            } else if let Some(path) = source.file {
                commands::read::TextSource::File(path)
            } else {
                commands::read::TextSource::Topic(source.topic.unwrap_or_default())
            };
            commands::read::execute(source, speed, answers, format, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
