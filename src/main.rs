mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};
use wordfall::{
    app_dirs::AppDirs,
    catalog::{Catalog, Theme},
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    game::{FrameReport, Game, GameOver, GameState},
    high_score::{FileHighScoreStore, HighScoreRecord, HighScoreStore, MemoryHighScoreStore},
    logging,
    runtime::{CrosstermEventSource, GameEvent, Runner},
    UNITS_PER_ROW,
};

/// falling-words typing game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words fall from the top of the screen. Type a word exactly to destroy it and score; every word that reaches the bottom costs a life. Ctrl+S starts or stops, Ctrl+P pauses, Ctrl+F toggles fullscreen."
)]
pub struct Cli {
    /// difficulty tier (overrides the saved setting)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// word theme to draw falling words from (overrides the saved setting)
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// motion frames per second
    #[clap(long)]
    fps: Option<u32>,

    /// fix the play area to this many rows instead of filling the terminal
    #[clap(long)]
    height_rows: Option<u16>,

    /// do not write settings or the high score to disk
    #[clap(long)]
    no_save: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Windowed,
    Fullscreen,
}

impl DisplayMode {
    fn toggled(self) -> Self {
        match self {
            DisplayMode::Windowed => DisplayMode::Fullscreen,
            DisplayMode::Fullscreen => DisplayMode::Windowed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub game: Game,
    pub config: Config,
    pub display: DisplayMode,
    pub play_rows: Option<u16>,
    pub last_game_over: Option<GameOver>,
    high_scores: Box<dyn HighScoreStore>,
}

impl App {
    pub fn new(
        game: Game,
        config: Config,
        play_rows: Option<u16>,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Self {
        Self {
            game,
            config,
            display: DisplayMode::Windowed,
            play_rows,
            last_game_over: None,
            high_scores,
        }
    }

    fn from_cli(cli: &Cli, config: Config, high_scores: Box<dyn HighScoreStore>) -> Self {
        let high_score = high_scores.load().high_score;
        let game = Game::new(
            Catalog::embedded(),
            config.difficulty,
            config.theme,
            high_score,
        );
        Self::new(game, config, cli.height_rows, high_scores)
    }

    /// Height of the play area in game units for a terminal of `area`.
    /// Never less than `MIN_PLAY_ROWS`, so a cramped terminal cannot put
    /// the miss line above the spawn line.
    pub fn play_height(&self, area: Rect) -> f64 {
        let rows = ui::play_area(area, self.display, self.play_rows)
            .height
            .max(ui::MIN_PLAY_ROWS);
        rows as f64 * UNITS_PER_ROW
    }

    pub fn on_frame(&mut self, now: Instant, area: Rect) -> FrameReport {
        let height = self.play_height(area);
        let report = self.game.on_frame(now, height);

        if let Some(over) = &report.game_over {
            // the summary is always shown windowed
            self.display = DisplayMode::Windowed;
            if over.new_high_score {
                self.persist_high_score(over.high_score);
            }
            self.last_game_over = Some(over.clone());
        }
        report
    }

    pub fn on_spawn(&mut self, now: Instant) {
        self.game.on_spawn_timer(now);
    }

    fn persist_high_score(&self, high_score: u64) {
        if let Err(e) = self.high_scores.save(&HighScoreRecord::new(high_score)) {
            log::warn!("could not save high score {high_score}: {e}");
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.display = self.display.toggled();
    }

    fn set_theme(&mut self, theme: Theme) {
        if self.game.set_theme(theme) {
            self.config.theme = theme;
        }
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.game.set_difficulty(difficulty) {
            self.config.difficulty = difficulty;
        }
    }

    fn type_text(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.game.input().to_string();
        edit(&mut text);
        self.game.on_input(&text);
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Char('s') | KeyCode::Char('S') if ctrl => {
                self.last_game_over = None;
                self.game.toggle_start_stop(now);
            }
            KeyCode::Char('p') | KeyCode::Char('P') if ctrl => {
                self.game.toggle_pause(now);
            }
            KeyCode::Char('f') | KeyCode::Char('F') if ctrl => self.toggle_fullscreen(),
            KeyCode::Enter => {
                if self.game.acknowledge() {
                    self.last_game_over = None;
                }
            }
            KeyCode::Tab => self.set_theme(self.game.theme().next()),
            KeyCode::BackTab => self.set_theme(self.game.theme().prev()),
            KeyCode::F(2) => self.set_difficulty(self.game.difficulty().next()),
            KeyCode::Backspace => self.type_text(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.type_text(|text| text.push(c)),
            _ => {}
        }
        Control::Continue
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the game runs without it
    let _ = logging::init_file_logger(&AppDirs::log_path());

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    let high_scores: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryHighScoreStore::new(
            FileHighScoreStore::new().load().high_score,
        ))
    } else {
        Box::new(FileHighScoreStore::new())
    };
    let mut app = App::from_cli(&cli, config, high_scores);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if !cli.no_save {
        if let Err(e) = config_store.save(&app.config) {
            log::warn!("could not save settings: {e}");
        }
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), app.config.frame_interval());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app.game.spawn_deadline()) {
            GameEvent::Frame => {
                if app.game.state() == GameState::Playing {
                    let size = terminal.size().unwrap_or_default();
                    app.on_frame(Instant::now(), Rect::new(0, 0, size.width, size.height));
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Spawn => app.on_spawn(Instant::now()),
            GameEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Key(key) => {
                if app.handle_key(key, Instant::now()) == Control::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
