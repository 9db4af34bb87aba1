//! normprobe CLI - Command-line harness for lossy normal encodings
//!
//! This binary renders the probe sphere under a chosen encoding, exports
//! highlight-centred captures and runs the offline codec surveys.

use clap::{Parser, Subcommand};
use normprobe_spec::EncodingMode;
use std::process::ExitCode;

use normprobe_cli::commands;
use normprobe_cli::commands::render::RenderView;
use normprobe_cli::input::ParamsArgs;

/// normprobe - Normal Encoding Probe
#[derive(Parser)]
#[command(name = "normprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame of the probe sphere to PNG
    Render {
        #[command(flatten)]
        params: ParamsArgs,

        /// Which buffer to write
        #[arg(long, value_enum, default_value_t = RenderView::Display)]
        view: RenderView,

        /// Output PNG path
        #[arg(short, long)]
        output: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Export a highlight-centred capture with a self-describing filename
    Export {
        #[command(flatten)]
        params: ParamsArgs,

        /// Directory the capture is written into
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Write the whole frame instead of the highlight crop
        #[arg(long)]
        full_frame: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Point the light by clicking on the sphere
    Pick {
        #[command(flatten)]
        params: ParamsArgs,

        /// Pointer x in pixels (left edge is 0)
        #[arg(long)]
        x: f64,

        /// Pointer y in pixels (top edge is 0)
        #[arg(long)]
        y: f64,

        /// Write the params with the new light to this file
        #[arg(short, long)]
        save: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Tabulate reconstruction error over bit depths for every codec
    Sweep {
        /// Bit depths, comma separated (default 2,3,4,5,6,8,10,16)
        #[arg(short, long, value_delimiter = ',')]
        bits: Vec<f64>,

        /// Hemisphere normals per cell
        #[arg(short = 'n', long, default_value_t = 20_000)]
        samples: usize,

        /// Sampling seed
        #[arg(long, default_value_t = 1)]
        seed: u32,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Survey a codec's area distortion over its lattice
    Distortion {
        /// Codec to survey (cartesian, hemi-oct)
        #[arg(short, long, default_value = "hemi-oct")]
        encoding: EncodingMode,

        /// Grid points per side
        #[arg(short, long, default_value_t = 256)]
        resolution: u32,

        /// Write the distortion field as a heatmap PNG
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compare two PNG captures and output difference metrics
    Compare {
        /// Path to the first file (reference)
        #[arg(short, long)]
        a: String,

        /// Path to the second file (comparison target)
        #[arg(short, long)]
        b: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a params file
    Validate {
        /// Path to the params file (JSON)
        #[arg(short, long)]
        params: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            params,
            view,
            output,
            json,
        } => commands::render::run(&params, view, &output, json),
        Commands::Export {
            params,
            out_dir,
            full_frame,
            json,
        } => commands::export::run(&params, &out_dir, full_frame, json),
        Commands::Pick {
            params,
            x,
            y,
            save,
            json,
        } => commands::pick::run(&params, x, y, save.as_deref(), json),
        Commands::Sweep {
            bits,
            samples,
            seed,
            json,
        } => commands::sweep::run(&bits, samples, seed, json),
        Commands::Distortion {
            encoding,
            resolution,
            output,
            json,
        } => commands::distortion::run(encoding, resolution, output.as_deref(), json),
        Commands::Compare { a, b, json } => commands::compare::run(&a, &b, json),
        Commands::Validate { params, json } => commands::validate::run(&params, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
