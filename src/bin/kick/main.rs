//! kick - render, play and shape kick drums from the terminal
//!
//! Run with: cargo run -- tui

mod app;
mod audio;
mod ui;

use std::{
    fs::File,
    path::PathBuf,
    sync::Mutex,
    thread,
    time::Duration,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use kick_synth::{
    dsp::{DecayCurve, Waveform},
    engine::Scheduler,
    io::{export_kick, preset},
    KickParams,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use audio::AudioOut;

#[derive(Parser)]
#[command(name = "kick")]
#[command(about = "Kick drum synthesizer", long_about = None)]
struct Cli {
    /// Load parameters from a TOML preset before applying overrides
    #[arg(short, long, global = true)]
    preset: Option<PathBuf>,

    /// Randomize frequency, volume, envelope and decay curve
    #[arg(long, global = true)]
    random: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Per-parameter overrides, applied on top of the preset.
#[derive(clap::Args, Default)]
struct Overrides {
    /// Oscillator frequency in Hz
    #[arg(long, global = true)]
    frequency: Option<f32>,

    /// Output gain, 0.0-1.0
    #[arg(long, global = true)]
    volume: Option<f32>,

    /// sine, square, triangle or sawtooth
    #[arg(long, global = true)]
    waveform: Option<Waveform>,

    /// Attack time in seconds
    #[arg(long, global = true)]
    attack: Option<f64>,

    /// Decay time in seconds
    #[arg(long, global = true)]
    decay: Option<f64>,

    /// Sustain level, 0.0-1.0
    #[arg(long, global = true)]
    sustain: Option<f64>,

    /// Release time in seconds
    #[arg(long, global = true)]
    release: Option<f64>,

    /// linear or exponential
    #[arg(long, global = true)]
    decay_curve: Option<DecayCurve>,

    /// Tempo for continuous playback
    #[arg(long, global = true)]
    bpm: Option<f32>,
}

impl Overrides {
    fn apply(&self, params: &mut KickParams) {
        let osc = &mut params.oscillator;
        let env = &mut params.envelope;
        if let Some(v) = self.frequency {
            osc.frequency = v;
        }
        if let Some(v) = self.volume {
            osc.volume = v;
        }
        if let Some(w) = self.waveform {
            osc.waveform = w;
        }
        if let Some(v) = self.attack {
            env.attack = v;
        }
        if let Some(v) = self.decay {
            env.decay = v;
        }
        if let Some(v) = self.sustain {
            env.sustain = v;
        }
        if let Some(v) = self.release {
            env.release = v;
        }
        if let Some(c) = self.decay_curve {
            env.decay_curve = c;
        }
        if let Some(v) = self.bpm {
            params.bpm = v;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the kick to a 16-bit mono WAV file
    Export {
        /// Output WAV file path
        output: PathBuf,
    },

    /// Play the kick once
    Play,

    /// Play the kick once per beat until Enter is pressed
    Loop,

    /// Interactive editor with live waveform, envelope and spectrum
    Tui {
        /// Where to write logs while the terminal is taken over
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Default path for the export key
        #[arg(long, default_value = "kick.wav")]
        export_path: PathBuf,
    },

    /// Write the current parameters to a TOML preset
    Preset {
        /// Output TOML file path
        output: PathBuf,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.command)?;

    let mut params = match &cli.preset {
        Some(path) => preset::load_preset(path)
            .wrap_err_with(|| format!("failed to load preset {}", path.display()))?,
        None => KickParams::default(),
    };
    cli.overrides.apply(&mut params);
    if cli.random {
        params.randomize(&mut rand::thread_rng());
    }

    match cli.command {
        Commands::Export { output } => {
            let signal = params.synth().generate();
            export_kick(&output, &signal)
                .wrap_err_with(|| format!("failed to export {}", output.display()))?;
            println!(
                "Wrote {} ({} samples, {:.2}s, peak {:.3})",
                output.display(),
                signal.len(),
                signal.duration(),
                signal.peak()
            );
        }

        Commands::Play => {
            let audio = AudioOut::open()?;
            let signal = params.synth().generate();
            info!(samples = signal.len(), "playing kick");
            audio.player().lock().map_err(|_| eyre!("player lock poisoned"))?.play(&signal);
            thread::sleep(Duration::from_secs_f64(signal.duration()) + Duration::from_millis(100));
        }

        Commands::Loop => {
            let audio = AudioOut::open()?;
            let player = audio.player();
            let synth = params.synth();
            let handle = Scheduler::start_bpm(params.bpm, move || {
                let signal = synth.generate();
                if let Ok(mut player) = player.lock() {
                    player.play(&signal);
                }
            })
            .ok_or_else(|| eyre!("invalid tempo: {} BPM", params.bpm))?;

            println!("Playing at {:.1} BPM. Press Enter to stop.", params.bpm);
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            handle.join();
        }

        Commands::Tui { export_path, .. } => {
            let audio = AudioOut::open()?;
            let mut app = App::new(params, audio.player(), export_path);

            let mut terminal = ratatui::init();
            let res = app.run(&mut terminal);
            ratatui::restore();
            res?;
        }

        Commands::Preset { output } => {
            preset::save_preset(&output, &params)
                .wrap_err_with(|| format!("failed to write preset {}", output.display()))?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

/// Logs go to stderr, except in the TUI where they would corrupt the screen.
fn init_logging(command: &Commands) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match command {
        Commands::Tui { log_file: Some(path), .. } => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Commands::Tui { log_file: None, .. } => {}
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
