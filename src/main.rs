use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pitchlab::{
    app::{App, Effect},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    dataset,
    hotkeys::{self, GlobalKeys},
    journal::SessionJournal,
    logging,
    playback::{PlaybackInvoker, SystemPlayer},
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::{ResultRecord, Session},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// keyboard-driven labeling of pitch video clips
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Plays a shuffled queue of pitch clips with the system video player and records pitch type, ball/strike and an early-timing flag for each one. Results are written to a timestamped CSV on exit."
)]
pub struct Cli {
    /// CSV of clips; must have a `new_name` column
    #[clap(short = 'd', long)]
    dataset: Option<PathBuf>,

    /// directory for session result files
    #[clap(short = 'o', long)]
    log_dir: Option<PathBuf>,

    /// directory clip names are resolved against
    #[clap(short = 'r', long)]
    video_root: Option<PathBuf>,

    /// denominator shown in the progress line
    #[clap(short = 't', long)]
    total: Option<usize>,

    /// seed for a reproducible clip order
    #[clap(long)]
    seed: Option<u64>,

    /// milliseconds to wait after handing a clip to the player before enabling submit
    #[clap(long)]
    settle_ms: Option<u64>,

    /// only accept keys while the terminal has focus
    #[clap(long)]
    local_keys: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        if let Some(root) = &self.video_root {
            config.video_root = Some(root.clone());
        }
        if let Some(total) = self.total {
            config.progress_total = total;
        }
        if let Some(ms) = self.settle_ms {
            config.settle_ms = ms;
        }
        if self.local_keys {
            config.global_keys = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::trace_log_path() {
        logging::init(&path);
    }

    let store = FileConfigStore::new();
    tracing::debug!(path = %store.path().display(), "loading config");
    let config = cli.apply(store.load_or_init());
    let mut clips = dataset::load(&config.dataset)?;
    dataset::shuffle(&mut clips, cli.seed);
    tracing::info!(clips = clips.len(), dataset = %config.dataset.display(), "session started");

    let mut app = App::new(Session::new(clips), &config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Bound keys come from the global listener once it is up; the terminal
    // reader then drops them so each press is delivered once.
    let global_active = Arc::new(AtomicBool::new(false));
    let source = {
        let active = Arc::clone(&global_active);
        let global = GlobalKeys::new(&config.keys);
        CrosstermEventSource::with_key_filter(move |key| {
            active.load(Ordering::Relaxed) && global.covers(key)
        })
    };
    let runner = Runner::new(source, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    if config.global_keys {
        let started = GlobalKeys::new(&config.keys).spawn(
            hotkeys::system_keyboard,
            runner.sender(),
            hotkeys::POLL_INTERVAL,
        );
        global_active.store(started, Ordering::Relaxed);
    }

    let invoker = PlaybackInvoker::new(
        Arc::new(SystemPlayer),
        Duration::from_millis(config.settle_ms),
        runner.sender(),
    );
    let outcome = start_tui(&mut terminal, &mut app, &runner, &invoker);

    let restored = restore_terminal(&mut terminal);
    let saved = save_results(
        &SessionJournal::new(&config.log_dir),
        app.session.results(),
        restored,
    )?;
    if let Some(path) = saved {
        println!("Saved {} results to {}", app.session.results().len(), path.display());
    }

    outcome
}

/// Try every restore step even if an earlier one fails; report the first error
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw.and(screen).and(cursor)
}

/// Write the session file, then surface any terminal restore failure.
/// Results are never dropped because the terminal misbehaved.
fn save_results(
    journal: &SessionJournal,
    results: &[ResultRecord],
    restored: io::Result<()>,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let written = journal.write(results, chrono::Local::now());
    restored?;
    Ok(written?)
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    invoker: &PlaybackInvoker,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        match app.handle_event(runner.step()) {
            Effect::Play(path) => invoker.dispatch(path),
            Effect::Quit => break,
            Effect::None => {}
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
