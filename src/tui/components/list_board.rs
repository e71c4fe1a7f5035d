//! # ListBoard Component
//!
//! Scrollable column of [`ListCard`]s, one per list.
//!
//! `ListBoard` is a transient component (created each frame) that wraps
//! `&'a mut BoardState` (persistent scroll state) plus borrowed props.
//! Rendering keeps the focused row inside the viewport; mouse wheel events
//! scroll freely until focus moves again.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::model::{ListId, TodoList};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::list_card::ListCard;
use crate::tui::components::text_field::TextField;
use crate::tui::event::TuiEvent;
use crate::tui::focus::Row;

/// Blank line between cards.
const CARD_GAP: u16 = 1;

/// Scroll state for the board. Lives in `TuiState`.
#[derive(Default)]
pub struct BoardState {
    pub scroll_state: ScrollViewState,
    /// Set when focus moved and the viewport should follow it.
    pub follow_focus: bool,
    /// Last known viewport height
    pub viewport_height: u16,
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            follow_focus: true,
            ..Self::default()
        }
    }

    /// Adjust the offset so rows `top..bottom` of the canvas are visible.
    fn reveal(&mut self, top: u16, bottom: u16) {
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y.saturating_add(self.viewport_height) {
            let y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y });
        }
    }

    /// Keep the offset within the canvas.
    fn clamp(&mut self, canvas_height: u16) {
        let max_y = canvas_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }
}

impl EventHandler for BoardState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => {
                self.follow_focus = false;
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                self.follow_focus = false;
                self.scroll_state.scroll_down();
                None
            }
            _ => None,
        }
    }
}

pub struct ListBoard<'a> {
    pub state: &'a mut BoardState,
    pub lists: &'a [TodoList],
    pub focus: Row,
    /// Live add-task field, drawn in the focused list
    pub input: &'a TextField,
    /// (list, task index, field) of the task under edit
    pub edit: Option<(ListId, usize, &'a TextField)>,
    /// List waiting for a second delete press
    pub confirm_delete: Option<ListId>,
}

impl ListBoard<'_> {
    /// Top edge of every card on the canvas, plus the total canvas height.
    fn layout(&self) -> (Vec<u16>, u16) {
        let mut tops = Vec::with_capacity(self.lists.len());
        let mut y: u16 = 0;
        for list in self.lists {
            tops.push(y);
            y = y.saturating_add(ListCard::height(list)).saturating_add(CARD_GAP);
        }
        (tops, y.saturating_sub(CARD_GAP))
    }

    fn card_for<'b>(&'b self, list: &'b TodoList) -> ListCard<'b> {
        let focus = (self.focus.list_id() == Some(list.id)).then_some(self.focus);
        ListCard {
            list,
            focus,
            input: focus.map(|_| self.input),
            edit: self
                .edit
                .filter(|(id, _, _)| *id == list.id)
                .map(|(_, index, field)| (index, field)),
            confirm_delete: self.confirm_delete == Some(list.id),
        }
    }
}

impl Component for ListBoard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.lists.is_empty() {
            let empty = Paragraph::new("No lists yet. Type a name above and press Enter.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        let (tops, canvas_height) = self.layout();
        // Leave a column for the scrollbar
        let content_width = area.width.saturating_sub(1);

        if self.state.follow_focus {
            let focused = self
                .lists
                .iter()
                .zip(&tops)
                .find_map(|(list, top)| {
                    ListCard::row_offset(list, self.focus).map(|o| top.saturating_add(o))
                });
            if let Some(y) = focused {
                self.state.reveal(y, y.saturating_add(1));
            } else if self.focus == Row::NewList {
                self.state.reveal(0, 1);
            }
        }
        self.state.clamp(canvas_height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let canvas = Rect::new(0, 0, content_width, canvas_height);
        for (list, top) in self.lists.iter().zip(&tops) {
            // Cards pushed past the largest canvas ratatui can address are dropped
            let rect = Rect::new(0, *top, content_width, ListCard::height(list)).intersection(canvas);
            if rect.is_empty() {
                continue;
            }
            scroll_view.render_widget(self.card_for(list), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
