pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use tracing::{info, warn};
use typtea::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    language::{EmbeddedLanguages, LanguageProvider},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{Phase, Session},
    stats::{compute_stats, TypingStats},
};

/// a minimal typing speed test in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test: type scrolling lines of common words against the clock and get your wpm and accuracy.",
    after_help = "Examples:\n  typtea --duration 60 --lang python\n  typtea -d 30 -l de\n  typtea --list-langs"
)]
pub struct Cli {
    /// test duration in seconds (10-300) [default: 30, or the last used]
    #[clap(short = 'd', long)]
    duration: Option<u64>,

    /// language for the typing test [default: en, or the last used]
    #[clap(short = 'l', long = "lang")]
    lang: Option<String>,

    /// list all available languages and exit
    #[clap(long)]
    list_langs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub state: AppState,
    pub final_stats: TypingStats,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: AppState::Typing,
            final_stats: TypingStats::default(),
        }
    }

    pub fn restart(&mut self) {
        self.session.reset();
        self.final_stats = TypingStats::default();
        self.set_state(AppState::Typing);
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Typing && self.session.tick() == Phase::Finished {
            self.show_results();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Enter if self.state == AppState::Results => self.restart(),
            KeyCode::Backspace if self.state == AppState::Typing => {
                self.session.remove_character();
                self.show_results_if_finished();
            }
            KeyCode::Char(c) if self.state == AppState::Typing && !ctrl && !c.is_control() => {
                self.session.add_character(c);
                self.show_results_if_finished();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn show_results_if_finished(&mut self) {
        if self.session.is_finished() {
            self.show_results();
        }
    }

    fn show_results(&mut self) {
        self.final_stats = compute_stats(&self.session);
        self.set_state(AppState::Results);
    }

    fn set_state(&mut self, state: AppState) {
        info!(from = %self.state, to = %state, "app state");
        self.state = state;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        // logging is best effort; the test still runs without it
        let _ = logging::init_file_logging(&log_path);
    }

    let mut languages = EmbeddedLanguages::new();
    if cli.list_langs {
        println!("Available languages:");
        println!(
            "{}",
            languages
                .list_available()
                .iter()
                .map(|l| format!("  {l}"))
                .join("\n")
        );
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = store
        .load()
        .with_overrides(cli.duration, cli.lang.as_deref());

    let session = match Session::new(config.session_config(), &mut languages) {
        Ok(session) => session,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, err).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(err) = store.save(&config) {
        warn!(error = %err, "could not save config");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let flow = match runner.step() {
            AppEvent::Tick => {
                app.on_tick();
                Flow::Continue
            }
            AppEvent::Resize => Flow::Continue,
            AppEvent::Key(key) => app.on_key(key),
        };

        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use typtea::{
        language::{WeightedWordSource, WordBank},
        session::SessionConfig,
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let bank = WordBank::new("xx", "test", vec!["abc".to_string()]).unwrap();
        let mut config = SessionConfig::new(30, "xx");
        config.chars_per_line = 10;
        let source = WeightedWordSource::new(bank).with_seed(5);
        App::new(Session::with_source(config, source).unwrap())
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["typtea"]);
        assert_eq!(cli.duration, None);
        assert_eq!(cli.lang, None);
        assert!(!cli.list_langs);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["typtea", "-d", "60", "-l", "python"]);
        assert_eq!(cli.duration, Some(60));
        assert_eq!(cli.lang.as_deref(), Some("python"));

        let cli = Cli::parse_from(["typtea", "--duration", "45", "--lang", "de", "--list-langs"]);
        assert_eq!(cli.duration, Some(45));
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert!(cli.list_langs);
    }

    #[test]
    fn test_cli_rejects_non_numeric_duration() {
        assert!(Cli::try_parse_from(["typtea", "-d", "soon"]).is_err());
    }

    #[test]
    fn test_keys_drive_session() {
        let mut app = test_app();
        assert_eq!(app.on_key(key(KeyCode::Char('a'))), Flow::Continue);
        app.on_key(key(KeyCode::Char('x')));
        assert_eq!(app.session.global_pos(), 2);
        assert_eq!(app.session.error_set().len(), 1);

        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.session.global_pos(), 1);
        assert!(app.session.error_set().is_empty());
    }

    #[test]
    fn test_control_chords_are_not_typed() {
        let mut app = test_app();
        app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(app.session.phase(), Phase::NotStarted);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    #[test]
    fn test_escape_quits() {
        let mut app = test_app();
        assert_eq!(app.on_key(key(KeyCode::Esc)), Flow::Quit);
    }

    #[test]
    fn test_enter_restarts_only_from_results() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('a')));
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.global_pos(), 1);

        app.show_results();
        assert_eq!(app.state, AppState::Results);
        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.session.global_pos(), 1);

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.phase(), Phase::NotStarted);
        assert_eq!(app.final_stats, TypingStats::default());
    }

    #[test]
    fn test_tick_before_start_stays_typing() {
        let mut app = test_app();
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn test_render_typing_screen() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("abc abc"));
        assert!(text.contains("30"));
    }

    #[test]
    fn test_render_results_screen() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('a')));
        app.show_results();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("acc"));
        assert!(text.contains("wpm"));
        assert!(text.contains("restart"));
    }

    #[test]
    fn test_app_state_display() {
        assert_eq!(AppState::Typing.to_string(), "Typing");
        assert_eq!(AppState::Results.to_string(), "Results");
    }
}
