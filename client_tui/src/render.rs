//! Terminal rendering of screens and match snapshots

use game_core::{DecoyBall, Difficulty, MatchMode, Side, Snapshot, StreakQuote};
use glam::Vec2;
use rand::Rng;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::helpers::centered_in;
use crate::login::{LoginField, LoginForm};

/// Smallest table, in cells, that still shows a playable match
pub const MIN_TABLE_COLS: u16 = 40;
pub const MIN_TABLE_ROWS: u16 = 12;

const BALL_GLYPH: &str = "●";

/// Outcome of drawing a match frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Drawn,
    /// Nothing was drawn; the caller should fall back to `draw_minimal`
    TooSmall,
}

/// Maps arena pixels onto a block of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    arena: Vec2,
}

impl Viewport {
    pub fn new(area: Rect, arena: Vec2) -> Self {
        Self { area, arena }
    }

    fn scale(value: f32, extent: f32, cells: u16) -> u16 {
        if cells == 0 || extent <= 0.0 {
            return 0;
        }
        let fraction = (value / extent).clamp(0.0, 1.0);
        ((fraction * cells as f32) as u16).min(cells - 1)
    }

    pub fn column(&self, x: f32) -> u16 {
        self.area.x + Self::scale(x, self.arena.x, self.area.width)
    }

    pub fn row(&self, y: f32) -> u16 {
        self.area.y + Self::scale(y, self.arena.y, self.area.height)
    }

    /// Cell holding a point, or None when the point is off the table
    pub fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        let on_table = (0.0..=self.arena.x).contains(&pos.x) && (0.0..=self.arena.y).contains(&pos.y);
        on_table.then(|| (self.column(pos.x), self.row(pos.y)))
    }

    /// Rows covered by a vertical span, at least one
    pub fn rows(&self, top: f32, bottom: f32) -> (u16, u16) {
        let first = self.row(top);
        let last = self.row(bottom).max(first);
        (first, last - first + 1)
    }
}

/// Random background tint while colour chaos is active
fn chaos_tint() -> Color {
    let mut rng = rand::thread_rng();
    Color::Rgb(rng.gen_range(30..110), rng.gen_range(30..110), rng.gen_range(30..110))
}

fn title_text(frame: &mut Frame, area: Rect) {
    let big_text = BigText::builder()
        .pixel_size(PixelSize::Sextant)
        .style(Style::new().cyan())
        .lines(vec!["DECEPTION".magenta().into(), "PONG".white().into()])
        .alignment(Alignment::Center)
        .build();
    frame.render_widget(big_text, area);
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
}

/// Title plus a vertical list of options, the selected one highlighted
pub fn draw_menu(frame: &mut Frame, heading: &str, options: &[String], selected: usize, footer: &str) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(8),
            Constraint::Length(options.len() as u16 * 2 + 3),
            Constraint::Length(2),
        ])
        .flex(Flex::Center)
        .split(frame.area());

    title_text(frame, layout[0]);

    let width = options.iter().map(|o| o.len()).max().unwrap_or(0) as u16 + 12;
    let box_area = centered_in(layout[1], width.max(heading.len() as u16 + 6), layout[1].height);
    let block = Block::default()
        .title(format!(" {} ", heading))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, box_area);

    let inner = box_area.inner(Margin::new(1, 1));
    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .flat_map(|(i, option)| {
            let line = if i == selected {
                Line::from(format!("> {} <", option)).style(Style::default().fg(Color::White).bold().italic())
            } else {
                Line::from(option.as_str()).style(Style::default().fg(Color::Green).bold())
            };
            [Line::from(""), line]
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

    frame.render_widget(hint(footer), layout[2]);
}

pub fn draw_login(frame: &mut Frame, form: &LoginForm) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(8), Constraint::Length(11), Constraint::Length(2)])
        .flex(Flex::Center)
        .split(frame.area());

    title_text(frame, layout[0]);

    let box_area = centered_in(layout[1], 44, 11);
    let block = Block::default()
        .title(" Login ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .style(Style::default().fg(Color::Green));
    frame.render_widget(block, box_area);

    let field = |label: &str, value: String, focused: bool| -> Line<'static> {
        let style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<10}", label), style),
            Span::styled(format!("{}{}", value, cursor), style),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field("Username", form.username.clone(), form.focus == LoginField::Username),
        Line::from(""),
        field("Password", form.masked_password(), form.focus == LoginField::Password),
        Line::from(""),
    ];
    if let Some(message) = &form.message {
        lines.push(Line::from(message.clone()).style(Style::default().fg(Color::Red)));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        box_area.inner(Margin::new(2, 1)),
    );

    frame.render_widget(
        hint("[Tab] Switch field  [Enter] Log in  [F2] Register  [Esc] Quit"),
        layout[2],
    );
}

pub fn draw_leaderboard(frame: &mut Frame, rows: &[(String, u32)], current_user: Option<&str>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(8), Constraint::Length(14), Constraint::Length(2)])
        .flex(Flex::Center)
        .split(frame.area());

    title_text(frame, layout[0]);

    let box_area = centered_in(layout[1], 44, 14);
    let block = Block::default()
        .title(" Leaderboard ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(block, box_area);

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from("No games played yet").style(Style::default().fg(Color::Gray))]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, (name, score))| {
                let text = format!("{:>2}. {:<20} {:>8}", i + 1, name, score);
                if Some(name.as_str()) == current_user {
                    Line::from(text).style(Style::default().fg(Color::White).bold())
                } else {
                    Line::from(text).style(Style::default().fg(Color::Gray))
                }
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        box_area.inner(Margin::new(1, 1)),
    );

    frame.render_widget(hint("[Esc] Back"), layout[2]);
}

fn score_title(snapshot: &Snapshot, win_score: u32) -> Line<'static> {
    let [left, right] = &snapshot.players;
    Line::from(vec![
        Span::styled(format!(" {} ({}) ", left, snapshot.score.left), Style::default().fg(Color::Cyan)),
        Span::styled(format!("first to {}", win_score), Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" ({}) {} ", snapshot.score.right, right), Style::default().fg(Color::Magenta)),
    ])
}

fn controls_line(snapshot: &Snapshot) -> Line<'static> {
    if let Some(effect) = snapshot.effect {
        let mut spans = vec![
            Span::styled("DECEPTION MODE ACTIVE", Style::default().fg(Color::Magenta).bold()),
            Span::raw(format!("  Effect changes in: {}s", effect.remaining.ceil() as u32)),
        ];
        if snapshot.reverse_controls {
            spans.push(Span::raw("  "));
            spans.push(Span::styled("CONTROLS REVERSED!", Style::default().fg(Color::Red).bold()));
        }
        return Line::from(spans);
    }

    let mut text = String::from("[W/S] Move");
    if snapshot.mode == MatchMode::PlayerVsPlayer {
        text.push_str("  [Up/Down] Player 2");
    }
    if snapshot.mode == MatchMode::PlayerVsComputer(Difficulty::Expert) && snapshot.streak > 0 {
        text.push_str(&format!("  AI streak: {}", snapshot.streak));
    }
    text.push_str("  [P] Pause  [Esc] Menu");
    Line::from(text)
}

fn draw_ball(frame: &mut Frame, viewport: &Viewport, pos: Vec2, style: Style) {
    if let Some((x, y)) = viewport.cell(pos) {
        frame.render_widget(Paragraph::new(BALL_GLYPH).style(style), Rect::new(x, y, 1, 1));
    }
}

fn decoy_style(decoy: &DecoyBall) -> Style {
    let [r, g, b] = decoy.color;
    let style = Style::default().fg(Color::Rgb(r, g, b));
    if decoy.alpha < 220 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// Draw one frame of a match
pub fn draw_match(frame: &mut Frame, snapshot: &Snapshot, win_score: u32, paused: bool) -> RenderStatus {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Fill(1), Constraint::Length(3)])
        .split(area);

    let table_area = layout[0];
    if table_area.width < MIN_TABLE_COLS + 2 || table_area.height < MIN_TABLE_ROWS + 2 {
        return RenderStatus::TooSmall;
    }

    let background = if snapshot.color_chaos() {
        chaos_tint()
    } else {
        Color::Reset
    };
    let table = Block::default()
        .title(score_title(snapshot, win_score))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Gray).bg(background));
    let inner = table.inner(table_area);
    frame.render_widget(Clear, table_area);
    frame.render_widget(table, table_area);

    let viewport = Viewport::new(inner, snapshot.arena);

    // Centre line
    let mid = viewport.column(snapshot.arena.x / 2.0);
    for y in (inner.y..inner.y + inner.height).step_by(2) {
        frame.render_widget(
            Paragraph::new("┊").style(Style::default().fg(Color::DarkGray)),
            Rect::new(mid, y, 1, 1),
        );
    }

    for paddle in snapshot.paddles.iter().filter(|p| p.visible) {
        let (top, height) = viewport.rows(
            paddle.pos.y - paddle.height / 2.0,
            paddle.pos.y + paddle.height / 2.0 - 1.0,
        );
        let color = match paddle.side {
            Side::Left => Color::Cyan,
            Side::Right => Color::Magenta,
        };
        let bar = Block::default().style(Style::default().bg(color));
        frame.render_widget(bar, Rect::new(viewport.column(paddle.pos.x), top, 1, height));
    }

    for decoy in &snapshot.decoys {
        draw_ball(frame, &viewport, decoy.pos, decoy_style(decoy));
    }
    if let Some(ball) = snapshot.ball.filter(|b| b.visible) {
        draw_ball(frame, &viewport, ball.pos, Style::default().fg(Color::White).bold());
    }

    let controls = Paragraph::new(controls_line(snapshot))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Gray)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(controls, layout[1]);

    if paused {
        let popup = centered_in(area, 36, 5);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new("\n[P] Resume  [Esc] Leave match")
                .block(
                    Block::default()
                        .title(" Paused ")
                        .title_alignment(Alignment::Center)
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double),
                )
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center),
            popup,
        );
    }

    RenderStatus::Drawn
}

/// Fallback when the terminal is too small for the table
///
/// Plain shapes only: no effects, decoys or tint.
pub fn draw_minimal(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Fill(1)])
        .split(area);

    let header = format!(
        "{} {} - {} {} (terminal too small)",
        snapshot.players[0], snapshot.score.left, snapshot.score.right, snapshot.players[1]
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().fg(Color::Yellow)),
        layout[0],
    );

    let table = layout[1];
    if table.width == 0 || table.height == 0 {
        return;
    }
    let viewport = Viewport::new(table, snapshot.arena);
    for paddle in &snapshot.paddles {
        let (top, height) = viewport.rows(
            paddle.pos.y - paddle.height / 2.0,
            paddle.pos.y + paddle.height / 2.0 - 1.0,
        );
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::White)),
            Rect::new(viewport.column(paddle.pos.x), top, 1, height),
        );
    }
    if let Some(ball) = snapshot.ball {
        draw_ball(frame, &viewport, ball.pos, Style::default().fg(Color::White));
    }
}

pub fn draw_game_over(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(8), Constraint::Length(7), Constraint::Length(2)])
        .flex(Flex::Center)
        .split(area);

    let winner = snapshot.winner_label.as_deref().unwrap_or("Nobody");
    let human_won = snapshot.winner_label.as_deref() == Some(snapshot.players[0].as_str());
    let big_text = BigText::builder()
        .pixel_size(PixelSize::Sextant)
        .lines(vec![if human_won {
            "VICTORY".green().into()
        } else {
            "DEFEAT".red().into()
        }])
        .alignment(Alignment::Center)
        .build();
    frame.render_widget(big_text, layout[0]);

    let lines = vec![
        Line::from(format!("{} wins!", winner)).style(Style::default().fg(Color::White).bold()),
        Line::from(""),
        Line::from(format!(
            "{} {} - {} {}",
            snapshot.players[0], snapshot.score.left, snapshot.score.right, snapshot.players[1]
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Game Over ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double),
            )
            .alignment(Alignment::Center),
        centered_in(layout[1], 50, 7),
    );

    frame.render_widget(hint("[R] Play again  [Esc] Menu"), layout[2]);
}

/// Blocking quote over the frozen match
///
/// `seconds_left` is the auto-dismiss countdown; forced quotes have none.
pub fn draw_quote(frame: &mut Frame, quote: &StreakQuote, seconds_left: Option<u64>) {
    let area = frame.area();
    let popup = centered_in(area, 60, 12);
    frame.render_widget(Clear, popup);

    let footer = match seconds_left {
        Some(secs) => format!("[Space] Continue ({}s)  [Esc] Leave match", secs),
        None => "[X] or [Esc] Exit".to_string(),
    };
    // Some quotes are stacked over several lines
    let text = format!("\"{}\"", quote.message);
    let mut lines = vec![Line::from("")];
    lines.extend(
        text.lines()
            .map(|line| Line::from(line.to_string()).style(Style::default().fg(Color::White).italic())),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(footer).style(Style::default().fg(Color::DarkGray)));
    let border = if quote.force_exit { Color::Red } else { Color::Yellow };
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} points in a row ", quote.streak))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .style(Style::default().fg(border)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}
