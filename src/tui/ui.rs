use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ListBoard, TitleBar};
use crate::tui::focus::Row;

const NEW_LIST_PLACEHOLDER: &str = "Name a new list and press Enter";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Min(0), Length(1)]);
    let [title_area, new_list_area, board_area, help_area] = layout.areas(frame.area());

    let lists = app.store.lists();
    let open_tasks: usize = lists
        .iter()
        .map(|l| l.tasks.len() - l.completed_count())
        .sum();
    TitleBar::new(lists.len(), open_tasks, &app.status_message).render(frame, title_area);

    let focus = tui.focus.current();
    draw_new_list_row(frame, new_list_area, tui, focus == Row::NewList);

    let edit = app
        .edit
        .as_ref()
        .map(|e| (e.list_id, e.task_index, &tui.edit_field));
    ListBoard {
        state: &mut tui.board,
        lists,
        focus,
        input: &tui.task_input,
        edit,
        confirm_delete: tui.confirm_delete,
    }
    .render(frame, board_area);

    let help = Paragraph::new(help_text(focus, app.edit.is_some(), tui.confirm_delete.is_some()))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn draw_new_list_row(frame: &mut Frame, area: Rect, tui: &TuiState, focused: bool) {
    let border_style = Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray });
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(" New list ")
        .padding(Padding::horizontal(1));

    let line = Line::from(
        tui.new_list
            .spans(Style::default().fg(Color::Green), focused, NEW_LIST_PLACEHOLDER),
    );
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Key hints for the focused row.
pub fn help_text(focus: Row, editing: bool, confirming: bool) -> &'static str {
    if confirming {
        return " d confirm delete · Esc keep list ";
    }
    match focus {
        Row::Task(..) if editing => " Enter save · Esc cancel · ↑↓ save and move ",
        Row::Task(..) => " Space toggle · e/Enter edit · d remove · ↑↓ move · Ctrl+C quit ",
        Row::ListHeader(_) => " d delete list · ↑↓ move · Ctrl+C quit ",
        Row::TaskInput(_) => " Enter add task · ↑↓ move · Ctrl+C quit ",
        Row::NewList => " Enter create list · ↑↓ move · Ctrl+C quit ",
    }
}
