//! Clipsmith CLI: command-line front end for the edit pipeline.
//!
//! Usage:
//!   clipsmith process <INPUT> --edit <JSON>        Apply an edit description
//!   clipsmith split <INPUT> --at <SECS>            Split a clip in two
//!   clipsmith transition <A> <B>                   Join two clips with a transition
//!   clipsmith freeze <INPUT> --point <T:D>...      Insert freeze frames
//!   clipsmith speed <INPUT> --clips <JSON>         Retime and rejoin clips
//!   clipsmith thumbnail <INPUT> --time <SECS>      Grab a JPEG frame
//!   clipsmith extract-audio <INPUT>                Extract the audio track as MP3
//!   clipsmith check                                Check the encoder setup

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use clipsmith_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "clipsmith",
    about = "Declarative video edits compiled to ffmpeg",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an edit description in one encode
    Process {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Edit description (JSON)
        #[arg(short, long)]
        edit: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "output.mp4")]
        output: PathBuf,
    },

    /// Split a clip into two parts
    Split {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Split point (seconds)
        #[arg(long)]
        at: f64,

        /// Output path for the first part
        #[arg(long, default_value = "part-1.mp4")]
        first: PathBuf,

        /// Output path for the second part
        #[arg(long, default_value = "part-2.mp4")]
        second: PathBuf,
    },

    /// Join two clips with a transition
    Transition {
        /// First clip
        clip_a: String,

        /// Second clip
        clip_b: String,

        /// Transition name (fade, dissolve, wipe-left, slide-up, ...)
        #[arg(long, default_value = "fade")]
        name: String,

        /// Overlap duration (seconds)
        #[arg(long, default_value = "1.0")]
        duration: f64,

        /// Length of the first clip (seconds)
        #[arg(long)]
        clip1_duration: f64,

        /// Output file path
        #[arg(short, long, default_value = "output.mp4")]
        output: PathBuf,
    },

    /// Insert freeze frames
    Freeze {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Freeze point as TIME:DURATION in seconds (repeatable)
        #[arg(long = "point", required = true)]
        points: Vec<String>,

        /// Output file path
        #[arg(short, long, default_value = "output.mp4")]
        output: PathBuf,
    },

    /// Cut, retime and rejoin clips
    Speed {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Clip list (JSON array of {startTime, endTime, speed})
        #[arg(long)]
        clips: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "output.mp4")]
        output: PathBuf,
    },

    /// Grab one frame as JPEG
    Thumbnail {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Frame time (seconds)
        #[arg(long, default_value = "0")]
        time: f64,

        /// Output width in pixels (height keeps the aspect ratio)
        #[arg(long)]
        width: Option<u32>,

        /// Output file path
        #[arg(short, long, default_value = "thumbnail.jpg")]
        output: PathBuf,
    },

    /// Extract the audio track as MP3
    ExtractAudio {
        /// Source clip (path or http(s) URL)
        input: String,

        /// Output file path
        #[arg(short, long, default_value = "audio.mp3")]
        output: PathBuf,
    },

    /// Check the encoder and configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    clipsmith_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Process {
            input,
            edit,
            output,
        } => commands::process::run(&config, input, edit, output).await,
        Commands::Split {
            input,
            at,
            first,
            second,
        } => commands::split::run(&config, input, at, first, second).await,
        Commands::Transition {
            clip_a,
            clip_b,
            name,
            duration,
            clip1_duration,
            output,
        } => {
            commands::transition::run(
                &config,
                clip_a,
                clip_b,
                name,
                duration,
                clip1_duration,
                output,
            )
            .await
        }
        Commands::Freeze {
            input,
            points,
            output,
        } => commands::freeze::run(&config, input, points, output).await,
        Commands::Speed {
            input,
            clips,
            output,
        } => commands::speed::run(&config, input, clips, output).await,
        Commands::Thumbnail {
            input,
            time,
            width,
            output,
        } => commands::extract::thumbnail(&config, input, time, width, output).await,
        Commands::ExtractAudio { input, output } => {
            commands::extract::audio(&config, input, output).await
        }
        Commands::Check => commands::check::run(&config).await,
    }
}
