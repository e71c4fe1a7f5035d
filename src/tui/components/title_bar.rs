//! # TitleBar Component
//!
//! Top status bar: app name, how many lists exist, how many tasks are still
//! open, and the latest status message.
//!
//! TitleBar is purely presentational. All three values are props:
//! - `list_count`, `open_tasks`: derived from the list store
//! - `status_message`: Core App state (last action result, save failures)
//!
//! The title text drops the status segment when there is nothing to say:
//!
//! 1. `"Tally | 2 lists, 3 open | Added list \"Work\""`
//! 2. `"Tally | 2 lists, 3 open"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    pub list_count: usize,
    pub open_tasks: usize,
    pub status_message: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(list_count: usize, open_tasks: usize, status_message: &'a str) -> Self {
        Self {
            list_count,
            open_tasks,
            status_message,
        }
    }

    fn summary(&self) -> String {
        let lists = if self.list_count == 1 { "list" } else { "lists" };
        format!("{} {}, {} open", self.list_count, lists, self.open_tasks)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "Tally",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::raw(self.summary()),
        ];

        if !self.status_message.is_empty() {
            let style = if self.status_message.starts_with("Save failed") {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status_message.to_string(), style));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new(2, 3, "Added list \"Work\"");
        let text = render_text(&mut title_bar);

        assert!(text.contains("Tally"));
        assert!(text.contains("2 lists, 3 open"));
        assert!(text.contains("Added list \"Work\""));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new(1, 0, "");
        let text = render_text(&mut title_bar);

        assert!(text.contains("1 list, 0 open"));
        assert_eq!(text.matches('|').count(), 1);
    }
}
