mod colors;
mod config;
mod settings;
mod terminal;

use anyhow::{Context, Result};
use asciifx::effects::EffectKind;
use asciifx::engine::{CellMetrics, Dimensions, FrameSink, PixelArea, SteppedClock, SystemClock};
use clap::{Parser, Subcommand};
use colors::ColorState;
use config::{PrintConfig, RunConfig};
use log::info;
use settings::Settings;
use std::io;
use terminal::TerminalSink;

#[derive(Parser)]
#[command(name = "asciifx")]
#[command(author = "ASCII Effects Showcase")]
#[command(version = "0.1.0")]
#[command(about = "Procedural character-grid animations for the terminal: fire, rain, starfields and more", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available effects
    List,

    /// Run an effect full-screen (q/Esc to quit, space to pause, 1-9 speed, shift+digit colours)
    Run {
        /// Effect to run: fire, matrix, warp, nebula, aurora, water, lightning, stream, glitch, hack, reactor, city
        #[arg(short, long, default_value = "matrix")]
        effect: String,

        /// Milliseconds per frame (defaults to the effect's own pace)
        #[arg(short, long)]
        tick: Option<u64>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Render a number of frames off-screen and print the last one to stdout
    Print {
        /// Effect to render
        #[arg(short, long, default_value = "matrix")]
        effect: String,

        /// Columns available to the effect
        #[arg(short, long, default_value = "80")]
        cols: u16,

        /// Rows available to the effect
        #[arg(short, long, default_value = "24")]
        rows: u16,

        /// Frames to render before printing
        #[arg(short, long, default_value = "60")]
        frames: u64,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// Off-screen sink for print mode: a fixed area, keeps only the latest frame
struct CaptureSink {
    area: PixelArea,
    last: String,
}

impl CaptureSink {
    fn new(cell: CellMetrics, cols: u16, rows: u16) -> Self {
        Self {
            area: cell.area_of(cols, rows),
            last: String::new(),
        }
    }
}

impl FrameSink for CaptureSink {
    fn area(&mut self) -> io::Result<PixelArea> {
        Ok(self.area)
    }

    fn publish(&mut self, frame: &str, _dims: Dimensions) -> io::Result<()> {
        self.last.clear();
        self.last.push_str(frame);
        Ok(())
    }
}

fn list() {
    for kind in EffectKind::ALL {
        println!("{:<10} {}", kind.name(), kind.about());
    }
}

fn run(config: RunConfig) -> Result<()> {
    let mut render = config.render_loop();
    let mut sink = TerminalSink::new(config.cell, ColorState::new(config.scheme))
        .context("failed to set up the terminal")?;
    render
        .run(&mut sink, &mut SystemClock::default())
        .with_context(|| format!("{} stopped", config.effect.name()))?;
    Ok(())
}

fn print(config: PrintConfig) -> Result<()> {
    let mut render = config.run.render_loop().with_frame_limit(config.frames.max(1));
    let mut sink = CaptureSink::new(config.run.cell, config.cols, config.rows);
    render
        .run(&mut sink, &mut SteppedClock::default())
        .context("offscreen render failed")?;
    println!("{}", sink.last);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Commands::List => list(),
        Commands::Run { effect, tick, seed } => {
            let config = RunConfig::new(&effect, tick, seed, &settings);
            info!("running {}", config.effect.name());
            run(config)?;
        }
        Commands::Print {
            effect,
            cols,
            rows,
            frames,
            seed,
        } => {
            let config = PrintConfig {
                run: RunConfig::new(&effect, None, seed, &settings),
                cols: cols.max(1),
                rows: rows.max(1),
                frames,
            };
            print(config)?;
        }
    }

    Ok(())
}
