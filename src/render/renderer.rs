use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// What occupies a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

impl Cell {
    fn span(self) -> Span<'static> {
        match self {
            Cell::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            Cell::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Head wins over body, body over food
pub fn cell_at(state: &GameState, pos: Position) -> Cell {
    if pos == state.snake.head() {
        Cell::Head
    } else if state.snake.contains(pos) {
        Cell::Body
    } else if state.food == Some(pos) {
        Cell::Food
    } else {
        Cell::Empty
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: Option<&GameState>, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let Some(state) = state else {
            frame.render_widget(self.waiting(), chunks[1]);
            frame.render_widget(self.controls(), chunks[2]);
            return;
        };

        frame.render_widget(self.header(state, metrics), chunks[0]);

        let board = if state.lost {
            self.game_over(state, metrics)
        } else {
            self.board(state)
        };
        frame.render_widget(board, chunks[1]);
        frame.render_widget(self.controls(), chunks[2]);
    }

    fn board(&self, state: &GameState) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..state.height)
            .map(|y| {
                Line::from(
                    (0..state.width)
                        .map(|x| cell_at(state, Position::new(x, y)).span())
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn header(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        Paragraph::new(Line::from(vec![
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Ticks: ", label),
            Span::styled(metrics.ticks.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ]))
        .alignment(Alignment::Center)
    }

    fn game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled("GAME OVER", bold(Color::Red))),
            Line::from(""),
            Line::from(format!(
                "Length {} after {} ticks ({})",
                state.snake.len(),
                metrics.ticks,
                metrics.format_time()
            )),
            Line::from(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("R", bold(Color::Green)),
                Span::raw(" to restart or "),
                Span::styled("Q", bold(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn waiting(&self) -> Paragraph<'static> {
        Paragraph::new("Press R to start")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn controls(&self) -> Paragraph<'static> {
        Paragraph::new(Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("HJKL", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
