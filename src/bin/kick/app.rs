//! Interactive kick editor
//!
//! Every parameter change renders the kick again, so the charts always show
//! exactly what `p` plays and `e` exports.

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use kick_synth::{
    dsp::EnvelopeBuilder,
    engine::{Scheduler, SchedulerHandle},
    io::export_kick,
    synth::{Param, ParamChange},
    KickParams, RenderedSignal, SAMPLE_RATE,
};
use ratatui::{DefaultTerminal, Frame};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing::{info, warn};

use crate::audio::SharedPlayer;
use crate::ui::{self, spectrum::SpectrumAnalyzer, transport::AudioStats};

/// FFT size for the spectrum view (zero-padded when the kick is shorter)
const FFT_SIZE: usize = 4096;
/// Highest frequency shown in the spectrum
const SPECTRUM_MAX_HZ: f32 = 2_000.0;

pub struct App {
    /// Shared with the loop thread so it always plays the latest kick
    params: Arc<Mutex<KickParams>>,
    signal: RenderedSignal,
    stats: AudioStats,
    spectrum: SpectrumAnalyzer,
    player: SharedPlayer,
    looping: Option<SchedulerHandle>,
    selected: usize,
    /// Typed value for the selected parameter, applied on Enter
    entry: String,
    export_path: PathBuf,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(params: KickParams, player: SharedPlayer, export_path: PathBuf) -> Self {
        let signal = params.synth().generate();
        let mut app = Self {
            params: Arc::new(Mutex::new(params)),
            stats: AudioStats::from_buffer(&signal.amplitude),
            signal,
            spectrum: SpectrumAnalyzer::new(FFT_SIZE, SAMPLE_RATE as f32, SPECTRUM_MAX_HZ),
            player,
            looping: None,
            selected: 0,
            entry: String::new(),
            export_path,
            status: String::from("ready"),
            should_quit: false,
        };
        app.spectrum.update(&app.signal.amplitude);
        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            // ~60fps so the playhead moves smoothly
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.stop_loop();
        Ok(())
    }

    fn snapshot(&self) -> KickParams {
        match self.params.lock() {
            Ok(params) => *params,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn selected_param(&self) -> Param {
        Param::ALL[self.selected]
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc if self.entry.is_empty() => self.should_quit = true,
            KeyCode::Esc => self.entry.clear(),

            KeyCode::Up => {
                self.selected = (self.selected + Param::ALL.len() - 1) % Param::ALL.len();
                self.entry.clear();
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % Param::ALL.len();
                self.entry.clear();
            }
            KeyCode::Left => {
                let param = self.selected_param();
                self.update(|params| param.nudge(params, -1));
            }
            KeyCode::Right => {
                let param = self.selected_param();
                self.update(|params| param.nudge(params, 1));
            }

            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => self.entry.push(c),
            KeyCode::Backspace => {
                self.entry.pop();
            }
            KeyCode::Enter => self.apply_entry(),

            KeyCode::Char('w') => self.update(|p| p.oscillator.waveform = p.oscillator.waveform.next()),
            KeyCode::Char('c') => self.update(|p| p.envelope.decay_curve = p.envelope.decay_curve.toggle()),
            KeyCode::Char('r') => self.update(|p| p.randomize(&mut rand::thread_rng())),
            KeyCode::Char('p') => self.preview(),
            KeyCode::Char('l') => self.toggle_loop(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    /// Change the parameters, then render again.
    fn update(&mut self, change: impl FnOnce(&mut KickParams)) {
        let (before, after) = {
            let mut params = match self.params.lock() {
                Ok(params) => params,
                Err(poisoned) => poisoned.into_inner(),
            };
            let before = *params;
            change(&mut *params);
            (before, *params)
        };

        if before == after {
            return;
        }
        self.rerender(&after);

        // The loop thread reads the tempo only when it starts
        if before.bpm != after.bpm && self.looping.is_some() {
            self.stop_loop();
            self.start_loop();
        }
    }

    fn apply_entry(&mut self) {
        let text = std::mem::take(&mut self.entry);
        if text.is_empty() {
            return;
        }
        // Malformed input is logged by the parser and otherwise ignored
        if let Some(change) = ParamChange::parse(self.selected_param(), &text) {
            self.update(|params| params.apply(change));
        }
    }

    fn rerender(&mut self, params: &KickParams) {
        self.signal = params.synth().generate();
        self.stats = AudioStats::from_buffer(&self.signal.amplitude);
        self.spectrum.update(&self.signal.amplitude);
    }

    fn preview(&mut self) {
        match self.player.lock() {
            Ok(mut player) => {
                player.play(&self.signal);
                self.status = String::from("playing");
            }
            Err(_) => warn!("player lock poisoned, preview skipped"),
        }
    }

    fn toggle_loop(&mut self) {
        if self.looping.is_some() {
            self.stop_loop();
            self.status = String::from("loop stopped");
        } else {
            self.start_loop();
        }
    }

    fn start_loop(&mut self) {
        let bpm = self.snapshot().bpm;
        let params = self.params.clone();
        let player = self.player.clone();

        // Re-render on every beat so edits are heard on the next kick
        self.looping = Scheduler::start_bpm(bpm, move || {
            let Ok(params) = params.lock().map(|p| *p) else {
                return;
            };
            let signal = params.synth().generate();
            if let Ok(mut player) = player.lock() {
                player.play(&signal);
            }
        });

        self.status = match self.looping {
            Some(_) => format!("looping at {bpm:.1} BPM"),
            None => format!("cannot loop at {bpm} BPM"),
        };
    }

    fn stop_loop(&mut self) {
        if let Some(handle) = self.looping.take() {
            handle.join();
        }
    }

    fn export(&mut self) {
        self.status = match export_kick(&self.export_path, &self.signal) {
            Ok(()) => {
                info!(path = %self.export_path.display(), "exported from editor");
                format!("exported {}", self.export_path.display())
            }
            Err(err) => {
                warn!(%err, "export failed");
                format!("export failed: {err}")
            }
        };
    }

    fn render(&self, frame: &mut Frame) {
        let progress = self
            .player
            .lock()
            .map(|player| player.progress())
            .unwrap_or(0.0);
        let params = self.snapshot();

        // Stage under the playhead while a preview is sounding
        let stage = (progress > 0.0 && progress < 1.0)
            .then(|| {
                let index = (progress * self.signal.len() as f64) as usize;
                EnvelopeBuilder::new(params.envelope, self.signal.sample_rate)
                    .stage_lengths(self.signal.len())
                    .stage_at(index)
            })
            .flatten();

        let view = ui::View {
            params: &params,
            selected: self.selected,
            entry: &self.entry,
            signal: &self.signal,
            stats: &self.stats,
            spectrum: self.spectrum.data(),
            looping: self.looping.is_some(),
            progress,
            stage,
            status: &self.status,
        };
        ui::render(frame, &view);
    }
}
