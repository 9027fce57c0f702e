use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use wordfall::{game::GameState, UNITS_PER_ROW};

use crate::{App, DisplayMode};

const HORIZONTAL_MARGIN: u16 = 2;
const INPUT_HEIGHT: u16 = 3;
const SUMMARY_WIDTH: u16 = 60;
const SUMMARY_HEIGHT: u16 = 14;
/// Fewest rows words are simulated in, even when fewer are visible
pub const MIN_PLAY_ROWS: u16 = 3;

struct Regions {
    hud: Option<Rect>,
    play: Rect,
    input: Rect,
    settings: Option<Rect>,
    legend: Option<Rect>,
}

fn regions(area: Rect, display: DisplayMode, play_rows: Option<u16>) -> Regions {
    let play = play_rows.map_or(Constraint::Min(MIN_PLAY_ROWS + 2), |rows| {
        Constraint::Length(rows.saturating_add(2))
    });

    match display {
        DisplayMode::Windowed => {
            let mut constraints = vec![
                Constraint::Length(1), // hud
                play,
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1), // settings
                Constraint::Length(1), // legend
            ];
            if play_rows.is_some() {
                constraints.push(Constraint::Min(0));
            }
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .horizontal_margin(HORIZONTAL_MARGIN)
                .constraints(constraints)
                .split(area);

            Regions {
                hud: Some(chunks[0]),
                play: chunks[1],
                input: chunks[2],
                settings: Some(chunks[3]),
                legend: Some(chunks[4]),
            }
        }
        DisplayMode::Fullscreen => {
            let mut constraints = vec![play, Constraint::Length(INPUT_HEIGHT)];
            if play_rows.is_some() {
                constraints.push(Constraint::Min(0));
            }
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(area);

            Regions {
                hud: None,
                play: chunks[0],
                input: chunks[1],
                settings: None,
                legend: None,
            }
        }
    }
}

/// Cells words fall through for a terminal of `area`
pub fn play_area(area: Rect, display: DisplayMode, play_rows: Option<u16>) -> Rect {
    Block::default()
        .borders(Borders::ALL)
        .inner(regions(area, display, play_rows).play)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn word_list(words: &[String]) -> String {
    if words.is_empty() {
        "None".to_string()
    } else {
        words.iter().join(", ")
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let regions = regions(area, self.display, self.play_rows);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let magenta_bold_style = Style::default().patch(bold_style).fg(Color::Magenta);
        let dim_italic_style = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let score_line = || {
            Line::from(vec![
                Span::raw("Score: "),
                Span::styled(game.score().to_string(), bold_style),
                Span::raw("   Lives: "),
                Span::styled(
                    game.lives().to_string(),
                    if game.lives() > 1 {
                        green_bold_style
                    } else {
                        red_bold_style
                    },
                ),
            ])
        };

        if let Some(hud) = regions.hud {
            let mut line = score_line();
            line.spans.extend([
                Span::raw("   High Score: "),
                Span::styled(game.high_score().to_string(), bold_style),
                Span::raw("   Level: "),
                Span::styled(
                    (game.level(std::time::Instant::now()) + 1).to_string(),
                    bold_style,
                ),
                Span::raw("   "),
                Span::styled(format!("[{}]", game.state()), dim_italic_style),
            ]);
            Paragraph::new(line).render(hud, buf);
        }

        let mut play_block = Block::default().borders(Borders::ALL);
        if regions.hud.is_none() {
            play_block = play_block.title(score_line());
        }
        let play = play_block.inner(regions.play);
        play_block.render(regions.play, buf);

        // falling words
        let typed = game.input().trim();
        for word in game.live_words() {
            let row = (word.y / UNITS_PER_ROW) as u16;
            if row >= play.height || play.width == 0 {
                continue;
            }
            let width = (word.text.width() as u16).min(play.width);
            let center = play.width as f64 * word.x / 100.0;
            let left = ((center - width as f64 / 2.0).round().max(0.0) as u16)
                .min(play.width - width);

            let spans = match word.text.strip_prefix(typed) {
                Some(rest) if !typed.is_empty() => vec![
                    Span::styled(typed, green_bold_style),
                    Span::styled(rest, magenta_bold_style),
                ],
                _ => vec![Span::styled(word.text.as_str(), magenta_bold_style)],
            };
            buf.set_line(
                play.x + left,
                play.y + row,
                &Line::from(spans),
                play.width - left,
            );
        }

        match game.state() {
            GameState::Idle => {
                let lines = vec![
                    Line::from(Span::styled("WORDFALL", magenta_bold_style)),
                    Line::default(),
                    Line::from("Type the falling words before they reach the bottom"),
                    Line::from(Span::styled("Press Ctrl+S to start", dim_italic_style)),
                ];
                let height = lines.len() as u16;
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(centered_rect(play.width, height, play), buf);
            }
            GameState::Paused => {
                Paragraph::new(Span::styled(
                    "PAUSED - Press Ctrl+P to resume",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD | Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(centered_rect(play.width, 1, play), buf);
            }
            GameState::Playing | GameState::Ended => {}
        }

        // input line
        let input_block = Block::default().borders(Borders::ALL).title(" Type ");
        let input_text = match game.state() {
            GameState::Playing if !game.input().is_empty() => {
                Span::styled(game.input(), bold_style)
            }
            GameState::Playing => Span::styled("Type here...", dim_italic_style),
            GameState::Paused => Span::styled("Paused", dim_italic_style),
            GameState::Idle | GameState::Ended => {
                Span::styled("Press Ctrl+S to play", dim_italic_style)
            }
        };
        Paragraph::new(input_text)
            .block(input_block)
            .render(regions.input, buf);

        if let Some(settings) = regions.settings {
            let mut spans = vec![
                Span::raw("Difficulty: "),
                Span::styled(game.difficulty().to_string(), bold_style),
                Span::raw(" (F2)   Theme: "),
                Span::styled(game.theme().label(), bold_style),
                Span::raw(" (tab)"),
            ];
            if game.state().is_running() {
                spans.push(Span::styled("   locked while playing", dim_italic_style));
            }
            Paragraph::new(Line::from(spans))
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .render(settings, buf);
        }

        if let Some(legend) = regions.legend {
            Paragraph::new(Span::styled(
                "(ctrl+s) start/stop / (ctrl+p) pause / (ctrl+f) fullscreen / (esc)ape",
                italic_style,
            ))
            .render(legend, buf);
        }

        if game.state() == GameState::Ended {
            let popup = centered_rect(SUMMARY_WIDTH, SUMMARY_HEIGHT, area);
            Clear.render(popup, buf);

            let mut lines = vec![
                Line::from("Your final score is:"),
                Line::from(Span::styled(game.score().to_string(), magenta_bold_style)),
            ];
            if self
                .last_game_over
                .as_ref()
                .is_some_and(|over| over.new_high_score)
            {
                lines.push(Line::from(Span::styled("New high score!", green_bold_style)));
            }
            lines.extend([
                Line::default(),
                Line::from(Span::styled("Correct Words", green_bold_style)),
                Line::from(word_list(game.correct_log())),
                Line::default(),
                Line::from(Span::styled("Missed Words", red_bold_style)),
                Line::from(word_list(game.missed_log())),
                Line::default(),
                Line::from(Span::styled(
                    "(enter) close / (ctrl+s) play again",
                    italic_style,
                )),
            ]);

            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Game Over ")
                        .title_alignment(Alignment::Center),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(popup, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use wordfall::{
        catalog::{Catalog, Theme},
        config::Config,
        difficulty::Difficulty,
        game::Game,
        high_score::MemoryHighScoreStore,
    };

    fn create_test_app() -> App {
        let game = Game::with_seed(Catalog::default(), Difficulty::Easy, Theme::All, 120, 1);
        App::new(
            game,
            Config::default(),
            None,
            Box::new(MemoryHighScoreStore::new(120)),
        )
    }

    fn render(app: &App, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn rendered(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn row_of(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
    }

    /// Cell coordinates of the first occurrence of `needle`
    fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
        (0..buffer.area.height).find_map(|y| {
            let row = row_of(buffer, y);
            row.find(needle)
                .map(|byte| (row[..byte].chars().count() as u16, y))
        })
    }

    #[test]
    fn test_find_reports_cell_columns_past_borders() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.game.place_word("whale", 0.0, 60.0);

        let area = Rect::new(0, 0, 80, 24);
        let buffer = render(&app, area);
        let play = play_area(area, DisplayMode::Windowed, None);
        let (x, y) = find(&buffer, "whale").expect("word drawn");
        assert_eq!((x, y), (play.x, play.y));
        assert_eq!(buffer[(x, y)].symbol(), "w");
        assert_eq!(buffer[(x - 1, y)].symbol(), "│");
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app();
        let text = rendered(&render(&app, Rect::new(0, 0, 80, 24)));

        assert!(text.contains("WORDFALL"));
        assert!(text.contains("Press Ctrl+S to play"));
        assert!(text.contains("High Score: 120"));
        assert!(text.contains("Difficulty: easy"));
        assert!(text.contains("Theme: All"));
    }

    #[test]
    fn test_playing_screen_shows_words_and_placeholder() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.game.place_word("whale", 50.0, 60.0);

        let text = rendered(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(text.contains("whale"));
        assert!(text.contains("Type here..."));
        assert!(text.contains("Lives: 3"));
        assert!(text.contains("locked while playing"));
    }

    #[test]
    fn test_word_row_follows_vertical_position() {
        let mut app = create_test_app();
        let t0 = Instant::now();
        app.game.start(t0);
        app.game.place_word("whale", 50.0, UNITS_PER_ROW * 3.0);
        app.game.on_frame(t0 + Duration::from_secs(1), 10_000.0);

        let area = Rect::new(0, 0, 80, 24);
        let buffer = render(&app, area);
        let play = play_area(area, DisplayMode::Windowed, None);
        let (_, y) = find(&buffer, "whale").expect("word drawn");
        assert_eq!(y, play.y + 3);
    }

    #[test]
    fn test_words_stay_inside_play_area() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.game.place_word("transportation", 95.0, 60.0);
        app.game.place_word("elephant", 5.0, 60.0);

        let area = Rect::new(0, 0, 40, 20);
        let buffer = render(&app, area);
        let play = play_area(area, DisplayMode::Windowed, None);

        let (x, _) = find(&buffer, "transportation").expect("right word drawn");
        assert!(x + 14 <= play.right());
        let (x, _) = find(&buffer, "elephant").expect("left word drawn");
        assert!(x >= play.x);
    }

    #[test]
    fn test_typed_prefix_is_highlighted() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.game.place_word("whale", 50.0, 60.0);
        app.game.on_input("wh");

        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let (x, y) = find(&buffer, "whale").expect("word drawn");
        assert_eq!(buffer[(x, y)].fg, Color::Green);
        assert_eq!(buffer[(x + 1, y)].fg, Color::Green);
        assert_eq!(buffer[(x + 2, y)].fg, Color::Magenta);
    }

    #[test]
    fn test_paused_screen() {
        let mut app = create_test_app();
        let t0 = Instant::now();
        app.game.start(t0);
        app.game.pause(t0);

        let text = rendered(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Paused"));
    }

    #[test]
    fn test_fullscreen_hides_chrome() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.display = DisplayMode::Fullscreen;

        let text = rendered(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(text.contains("Score: 0"));
        assert!(!text.contains("High Score"));
        assert!(!text.contains("Difficulty"));
        assert!(!text.contains("(ctrl+f)"));
    }

    #[test]
    fn test_fullscreen_play_area_is_larger() {
        let area = Rect::new(0, 0, 80, 24);
        let windowed = play_area(area, DisplayMode::Windowed, None);
        let fullscreen = play_area(area, DisplayMode::Fullscreen, None);
        assert!(fullscreen.height > windowed.height);
        assert!(fullscreen.width > windowed.width);
    }

    #[test]
    fn test_fixed_play_rows() {
        let area = Rect::new(0, 0, 80, 40);
        assert_eq!(play_area(area, DisplayMode::Windowed, Some(12)).height, 12);
        assert_eq!(play_area(area, DisplayMode::Fullscreen, Some(12)).height, 12);
    }

    #[test]
    fn test_game_over_summary() {
        let mut app = create_test_app();
        let t0 = Instant::now();
        let area = Rect::new(0, 0, 80, 24);
        app.game.start(t0);
        for _ in 0..3 {
            app.game.place_word("cat", 50.0, 10_000.0);
        }
        app.on_frame(t0 + Duration::from_secs(1), area);

        let text = rendered(&render(&app, area));
        assert!(text.contains("Game Over"));
        assert!(text.contains("Your final score is:"));
        assert!(text.contains("Missed Words"));
        assert!(text.contains("cat, cat, cat"));
        assert!(text.contains("Correct Words"));
        assert!(text.contains("None"));
        assert!(!text.contains("New high score!"));
    }

    #[test]
    fn test_game_over_announces_new_high_score() {
        let mut app = create_test_app();
        let t0 = Instant::now();
        let area = Rect::new(0, 0, 80, 24);
        app.game.start(t0);
        app.game.place_word("transportation", 50.0, 1.0);
        app.game.on_input("transportation");
        for _ in 0..3 {
            app.game.place_word("cat", 50.0, 10_000.0);
        }
        app.on_frame(t0 + Duration::from_secs(1), area);

        let text = rendered(&render(&app, area));
        assert!(text.contains("New high score!"));
        assert!(text.contains("140"));
        assert!(text.contains("transportation"));
    }

    #[test]
    fn test_word_list_formatting() {
        assert_eq!(word_list(&[]), "None");
        assert_eq!(
            word_list(&["cat".to_string(), "dog".to_string()]),
            "cat, dog"
        );
    }

    #[test]
    fn test_renders_in_tiny_areas() {
        let mut app = create_test_app();
        app.game.start(Instant::now());
        app.game.place_word("hippopotamus", 50.0, 60.0);

        for (w, h) in [(1, 1), (5, 3), (10, 10), (200, 5)] {
            render(&app, Rect::new(0, 0, w, h));
        }
    }
}
