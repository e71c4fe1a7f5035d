use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthChar;

use crate::core::model::{Task, TodoList};
use crate::tui::components::text_field::TextField;
use crate::tui::focus::Row;

/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;
/// Borders plus one column of padding on each side.
const HORIZONTAL_OVERHEAD: u16 = 4;

const TASK_PLACEHOLDER: &str = "Add a task...";

/// One list drawn as a bordered card.
///
/// ```text
/// ╭ Groceries (1/2) ─────────────╮
/// │ [ ] Milk                     │
/// │ [x] Bread                    │
/// │ + Add a task...              │
/// ╰──────────────── d delete list╯
/// ```
///
/// Transient: built each frame from borrowed state. The focused row is passed
/// in only when it belongs to this list. `input` and `edit` are the live text
/// fields, supplied only while the add-task row or a task of this list is
/// being typed into.
#[derive(Clone, Copy)]
pub struct ListCard<'a> {
    pub list: &'a TodoList,
    pub focus: Option<Row>,
    pub input: Option<&'a TextField>,
    /// Task index under edit and its field
    pub edit: Option<(usize, &'a TextField)>,
    /// Waiting for the second delete press
    pub confirm_delete: bool,
}

impl<'a> ListCard<'a> {
    pub fn new(list: &'a TodoList) -> Self {
        Self {
            list,
            focus: None,
            input: None,
            edit: None,
            confirm_delete: false,
        }
    }

    /// Rows the card occupies: every task, the input row and both borders.
    pub fn height(list: &TodoList) -> u16 {
        rows_u16(list.tasks.len()).saturating_add(1 + VERTICAL_OVERHEAD)
    }

    /// Offset of `row` from the card's top edge, if the row is in this card.
    pub fn row_offset(list: &TodoList, row: Row) -> Option<u16> {
        match row {
            Row::ListHeader(id) if id == list.id => Some(0),
            Row::Task(id, i) if id == list.id && i < list.tasks.len() => {
                Some(rows_u16(i).saturating_add(1))
            }
            Row::TaskInput(id) if id == list.id => Some(rows_u16(list.tasks.len()).saturating_add(1)),
            _ => None,
        }
    }

    fn task_line(&self, index: usize, task: &Task) -> Line<'static> {
        let focused = self.focus == Some(Row::Task(self.list.id, index));
        let marker = if task.completed { "[x] " } else { "[ ] " };

        if let Some((edit_index, field)) = self.edit
            && edit_index == index
        {
            let mut spans = vec![Span::styled(marker, Style::default().fg(Color::DarkGray))];
            spans.extend(field.spans(Style::default().fg(Color::Yellow), true, ""));
            return Line::from(spans);
        }

        let mut text_style = if task.completed {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };
        let mut marker_style = Style::default().fg(if task.completed {
            Color::Green
        } else {
            Color::Gray
        });
        if focused {
            text_style = text_style.add_modifier(Modifier::REVERSED);
            marker_style = marker_style.add_modifier(Modifier::BOLD);
        }
        Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(task.text.clone(), text_style),
        ])
    }

    fn input_line(&self) -> Line<'static> {
        let focused = self.focus == Some(Row::TaskInput(self.list.id));
        let prompt_style = Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray });
        let mut spans = vec![Span::styled("+ ", prompt_style)];
        match self.input {
            Some(field) if focused => {
                spans.extend(field.spans(Style::default(), true, TASK_PLACEHOLDER));
            }
            _ => {
                let buffered = TextField::with_text(&self.list.new_task_text);
                spans.extend(buffered.spans(Style::default(), false, TASK_PLACEHOLDER));
            }
        }
        Line::from(spans)
    }

    fn block(&self, width: u16) -> Block<'static> {
        let header_focused = self.focus == Some(Row::ListHeader(self.list.id));
        let border_style = if self.confirm_delete {
            Style::default().fg(Color::Red)
        } else if self.focus.is_some() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut title_style = border_style.add_modifier(Modifier::BOLD);
        if header_focused {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }

        let counts = format!(
            " ({}/{})",
            self.list.completed_count(),
            self.list.tasks.len()
        );
        let room = (width.saturating_sub(HORIZONTAL_OVERHEAD) as usize)
            .saturating_sub(counts.len() + 2);
        let title = Line::from(vec![
            Span::styled(format!(" {}", truncate_to_width(&self.list.name, room)), title_style),
            Span::styled(format!("{} ", counts), border_style),
        ]);

        let hint = if self.confirm_delete {
            " d again to delete list, Esc to keep "
        } else if header_focused {
            " d delete list "
        } else {
            ""
        };

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(Span::styled(hint, border_style)).right_aligned())
            .padding(Padding::horizontal(1))
    }
}

impl Widget for ListCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block(area.width);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = self
            .list
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| self.task_line(i, task))
            .collect();
        lines.push(self.input_line());

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Row counts past `u16::MAX` are pinned there; the board clips to its canvas.
fn rows_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Cut `s` to at most `max_width` terminal columns, ending in "…" if cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groceries() -> TodoList {
        let mut list = TodoList::new(1, "Groceries");
        list.tasks.push(Task::new("Milk"));
        list.tasks.push(Task {
            text: "Bread".into(),
            completed: true,
        });
        list
    }

    fn render_card(card: ListCard, width: u16) -> String {
        let height = ListCard::height(card.list);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_height_counts_tasks_input_and_borders() {
        assert_eq!(ListCard::height(&groceries()), 5);
        assert_eq!(ListCard::height(&TodoList::new(2, "Empty")), 3);
    }

    #[test]
    fn test_height_saturates_for_huge_lists() {
        let mut list = TodoList::new(1, "Huge");
        list.tasks = vec![Task::new("x"); 70_000];
        assert_eq!(ListCard::height(&list), u16::MAX);
        assert_eq!(ListCard::row_offset(&list, Row::TaskInput(1)), Some(u16::MAX));
        assert_eq!(ListCard::row_offset(&list, Row::Task(1, 69_999)), Some(u16::MAX));
    }

    #[test]
    fn test_row_offsets() {
        let list = groceries();
        assert_eq!(ListCard::row_offset(&list, Row::ListHeader(1)), Some(0));
        assert_eq!(ListCard::row_offset(&list, Row::Task(1, 1)), Some(2));
        assert_eq!(ListCard::row_offset(&list, Row::TaskInput(1)), Some(3));
        assert_eq!(ListCard::row_offset(&list, Row::Task(1, 5)), None);
        assert_eq!(ListCard::row_offset(&list, Row::ListHeader(2)), None);
    }

    #[test]
    fn test_render_shows_name_tasks_and_placeholder() {
        let list = groceries();
        let text = render_card(ListCard::new(&list), 40);
        assert!(text.contains("Groceries (1/2)"));
        assert!(text.contains("[ ] Milk"));
        assert!(text.contains("[x] Bread"));
        assert!(text.contains("Add a task..."));
    }

    #[test]
    fn test_render_shows_buffered_task_text() {
        let mut list = groceries();
        list.new_task_text = "Eggs".into();
        let text = render_card(ListCard::new(&list), 40);
        assert!(text.contains("+ Eggs"));
        assert!(!text.contains("Add a task..."));
    }

    #[test]
    fn test_render_edit_field_replaces_task_text() {
        let list = groceries();
        let field = TextField::with_text("Oat milk");
        let card = ListCard {
            focus: Some(Row::Task(1, 0)),
            edit: Some((0, &field)),
            ..ListCard::new(&list)
        };
        let text = render_card(card, 40);
        assert!(text.contains("[ ] Oat milk"));
        assert!(!text.contains("[ ] Milk"));
    }

    #[test]
    fn test_render_delete_confirmation_hint() {
        let list = groceries();
        let card = ListCard {
            focus: Some(Row::ListHeader(1)),
            confirm_delete: true,
            ..ListCard::new(&list)
        };
        let text = render_card(card, 50);
        assert!(text.contains("d again to delete list"));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Groceries", 20), "Groceries");
        assert_eq!(truncate_to_width("Groceries", 5), "Groc…");
        assert_eq!(truncate_to_width("Groceries", 0), "");
    }
}
