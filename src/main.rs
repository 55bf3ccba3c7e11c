mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use paratype::{
    app_dirs::AppDirs,
    clipboard::ClipboardSink,
    corpus::{Corpus, Level, Selection},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, ThreadTickScheduler, Ticker},
    session::Phase,
    store::{FileSessionStore, MemorySessionStore, SessionStore},
    trainer::Trainer,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "PARATYPE_LOG";

/// paragraph typing trainer with live feedback and speed/accuracy results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a paragraph as fast and accurately as you can. Every character is checked as you type; words per minute, correct characters per second and accuracy are shown when you finish."
)]
pub struct Cli {
    /// language tag of the paragraphs to type (defaults to the last one used, then "en")
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// difficulty level (defaults to the last one used, then normal)
    #[clap(short = 'L', long, value_enum)]
    level: Option<Level>,

    /// JSON corpus to load instead of the built-in paragraphs
    #[clap(long)]
    corpus: Option<PathBuf>,

    /// seed for paragraph choice and word scrambling
    #[clap(long)]
    seed: Option<u64>,

    /// where to remember the language and level between runs
    #[clap(long)]
    state_file: Option<PathBuf>,

    /// do not read or write the remembered language and level
    #[clap(long)]
    no_persist: bool,

    /// write a log to the default log file
    #[clap(long)]
    log: bool,

    /// write a log to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn store(&self) -> Box<dyn SessionStore> {
        if self.no_persist {
            Box::new(MemorySessionStore::new())
        } else if let Some(path) = &self.state_file {
            Box::new(FileSessionStore::with_path(path))
        } else {
            Box::new(FileSessionStore::new())
        }
    }

    fn rng(&self) -> Box<dyn RngCore + Send> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        }
    }

    fn corpus(&self) -> paratype::Result<Corpus> {
        match &self.corpus {
            Some(path) => Corpus::from_path(path),
            None => Corpus::embedded(),
        }
    }

    /// Selection requested on the command line, layered over `current`
    fn requested_selection(&self, current: &Selection) -> Option<Selection> {
        if self.language.is_none() && self.level.is_none() {
            return None;
        }
        Some(Selection::new(
            self.language
                .clone()
                .unwrap_or_else(|| current.language.clone()),
            self.level.unwrap_or(current.level),
        ))
    }

    fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.log) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(AppDirs::log_path()),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// System clipboard, opened on first copy
#[derive(Default)]
struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> paratype::Result<()> {
        let clipboard_err = |err: arboard::Error| paratype::Error::Clipboard(err.to_string());

        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(clipboard_err)?);
        }
        if let Some(clipboard) = &mut self.inner {
            clipboard.set_text(text).map_err(clipboard_err)?;
        }
        Ok(())
    }
}

pub struct App {
    pub trainer: Trainer,
    clipboard: Box<dyn ClipboardSink>,
}

impl App {
    pub fn new(trainer: Trainer, clipboard: Box<dyn ClipboardSink>) -> Self {
        Self { trainer, clipboard }
    }

    /// Copy the paragraph; what lands on the clipboard is the placeholder
    fn copy_reference(&mut self) {
        let payload = self.trainer.copy_reference();
        match self.clipboard.set_text(payload) {
            Ok(()) => info!("reference copied"),
            Err(err) => warn!(%err, "copy failed"),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.code == KeyCode::Char('y') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.copy_reference();
            return Flow::Continue;
        }

        let trainer = &mut self.trainer;

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Left => trainer.try_again(),
            KeyCode::Right => {
                trainer.next_paragraph();
            }
            KeyCode::Up => {
                trainer.cycle_level(true);
            }
            KeyCode::Down => {
                trainer.cycle_level(false);
            }
            KeyCode::Tab => {
                trainer.cycle_language(true);
            }
            KeyCode::BackTab => {
                trainer.cycle_language(false);
            }
            KeyCode::Backspace => {
                trainer.backspace(now);
            }
            KeyCode::Char(c) if trainer.phase() == Phase::Locked => match c {
                'r' => trainer.try_again(),
                'n' => {
                    trainer.next_paragraph();
                }
                _ => {}
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                trainer.type_char(c, now);
            }
            _ => {}
        }

        Flow::Continue
    }

    pub fn on_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Key(key) => return self.on_key(key, now),
            AppEvent::Paste(text) => {
                self.trainer.paste(&text, now);
            }
            AppEvent::Tick(id) => {
                self.trainer.on_tick(id);
            }
            AppEvent::Resize | AppEvent::Idle => {}
        }
        Flow::Continue
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let Some(path) = cli.log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli)?;
    let corpus = cli.corpus()?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let scheduler = ThreadTickScheduler::new(events.sender());
    let mut trainer = Trainer::new(
        corpus,
        cli.store(),
        cli.rng(),
        Box::new(scheduler),
        Selection::default(),
    );
    if let Some(selection) = cli.requested_selection(trainer.selection()) {
        trainer.select(selection);
    }
    info!(selection = ?trainer.selection(), "trainer ready");

    let mut app = App::new(trainer, Box::new(SystemClipboard::default()));
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.on_event(runner.step(), Instant::now()) == Flow::Quit {
            break;
        }
    }

    Ok(())
}
