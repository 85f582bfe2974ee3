//! Full-screen terminal surface using ratatui.

use super::{OutputSurface, markup_lines};
use crate::error::DisplayError;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::{self, Stdout};

pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
}

impl TerminalSurface {
    pub fn new(title: &str) -> Result<Self, DisplayError> {
        let init = |e: io::Error| DisplayError::InitializationError(e.to_string());

        terminal::enable_raw_mode().map_err(init)?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen).map_err(init)?;
        stdout.execute(cursor::Hide).map_err(init)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(init)?;
        terminal.clear().map_err(init)?;

        let mut surface = Self {
            terminal,
            title: title.to_string(),
        };
        // Blank panel until the first reading arrives
        surface.draw(None)?;
        Ok(surface)
    }

    fn draw(&mut self, markup: Option<&str>) -> Result<(), DisplayError> {
        let title = self.title.clone();
        self.terminal
            .draw(|frame| render(frame, &title, markup))
            .map(|_| ())
            .map_err(|e| DisplayError::WriteError(e.to_string()))
    }
}

fn render(frame: &mut Frame, title: &str, markup: Option<&str>) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<Line> = match markup {
        Some(markup) => markup_lines(markup)
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::White))))
            .collect(),
        None => vec![Line::from(Span::styled(
            "Waiting for readings...",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    frame.render_widget(Paragraph::new(lines).block(block), body);

    let hint = Line::from(vec![
        Span::styled("q/Esc", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(hint), footer);
}

impl OutputSurface for TerminalSurface {
    fn write(&mut self, markup: &str) -> Result<(), DisplayError> {
        self.draw(Some(markup))
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = terminal::disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
        let _ = self.terminal.backend_mut().execute(cursor::Show);
    }
}
