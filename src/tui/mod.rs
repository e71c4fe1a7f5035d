//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration draws if something changed, then waits up to 250ms for
//! input and drains every pending event before drawing again. State changes
//! go through `core::action::update`. Whenever the result is
//! `Effect::Persist`, a snapshot of the lists is pushed onto the save queue
//! and the loop carries on without waiting for the write.
//!
//! ## Focus and Editing
//!
//! Key events are routed by the focused [`Row`](focus::Row). Moving focus
//! away from a task under edit saves the edit first.

mod component;
pub mod components;
mod event;
pub mod focus;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::model::ListId;
use crate::core::state::App;
use crate::storage::SaveQueue;
use crate::tui::component::EventHandler;
use crate::tui::components::{BoardState, FieldEvent, TextField};
use crate::tui::event::{poll_event_immediate, poll_event_timeout};
use crate::tui::focus::{FocusState, Row};

pub use crate::tui::event::TuiEvent;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: FocusState,
    pub board: BoardState,
    /// Text of the new-list row
    pub new_list: TextField,
    /// Field for the focused list's add-task row, mirrored into `new_task_text`
    pub task_input: TextField,
    /// Field for the task under edit, mirrored into the edit session
    pub edit_field: TextField,
    /// List waiting for a second delete press
    pub confirm_delete: Option<ListId>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: FocusState::new(),
            board: BoardState::new(),
            new_list: TextField::new(),
            task_input: TextField::new(),
            edit_field: TextField::new(),
            confirm_delete: None,
        }
    }
}

/// What the event loop must do after handling one event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopSignal {
    pub persist: bool,
    pub quit: bool,
}

impl LoopSignal {
    fn absorb(&mut self, effect: Effect) {
        match effect {
            Effect::Persist => self.persist = true,
            Effect::Quit => self.quit = true,
            Effect::None => {}
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(mut app: App, saves: &SaveQueue, rx: mpsc::Receiver<Action>) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let signal = handle_event(&mut app, &mut tui, &event);
            if signal.persist {
                saves.enqueue(app.store.snapshot());
            }
            if signal.quit {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break Ok(());
        }

        // Handle background task actions (save failures)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if update(&mut app, action) == Effect::Persist {
                saves.enqueue(app.store.snapshot());
            }
        }
    };

    ratatui::restore();
    result
}

/// Route one event to the focused row and apply the resulting actions.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> LoopSignal {
    let mut signal = LoopSignal::default();

    match event {
        TuiEvent::Resize => return signal,
        TuiEvent::ForceQuit => {
            // Quitting is a loss of focus too
            if app.edit.is_some() {
                signal.absorb(update(app, Action::SaveEdit));
            }
            signal.absorb(update(app, Action::Quit));
            return signal;
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            tui.board.handle_event(event);
            return signal;
        }
        _ => {}
    }

    let rows = focus::rows(app.store.lists());
    let row = tui.focus.resolve(&rows);

    let delete_press = matches!(
        event,
        TuiEvent::Remove | TuiEvent::Delete | TuiEvent::InputChar('d')
    );
    if !(delete_press && matches!(row, Row::ListHeader(_))) {
        tui.confirm_delete = None;
    }

    match event {
        TuiEvent::FocusUp => move_focus(app, tui, &rows, -1, &mut signal),
        TuiEvent::FocusDown => move_focus(app, tui, &rows, 1, &mut signal),
        _ => match row {
            Row::NewList => handle_new_list(app, tui, event, &mut signal),
            Row::ListHeader(list_id) => {
                if delete_press {
                    if tui.confirm_delete == Some(list_id) {
                        tui.confirm_delete = None;
                        signal.absorb(update(app, Action::DeleteList(list_id)));
                    } else {
                        tui.confirm_delete = Some(list_id);
                    }
                }
            }
            Row::Task(list_id, task_index) => {
                handle_task(app, tui, event, list_id, task_index, &mut signal)
            }
            Row::TaskInput(list_id) => handle_task_input(app, tui, event, list_id, &mut signal),
        },
    }

    sync_focus(app, tui);
    signal
}

fn handle_new_list(app: &mut App, tui: &mut TuiState, event: &TuiEvent, signal: &mut LoopSignal) {
    if matches!(event, TuiEvent::Escape) {
        tui.new_list.clear();
        return;
    }
    if tui.new_list.handle_event(event) == Some(FieldEvent::Submit) {
        let name = tui.new_list.take();
        signal.absorb(update(app, Action::AddList(name)));
    }
}

fn handle_task_input(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    list_id: ListId,
    signal: &mut LoopSignal,
) {
    match tui.task_input.handle_event(event) {
        Some(FieldEvent::Changed) => {
            let text = tui.task_input.text().to_string();
            signal.absorb(update(app, Action::SetNewTaskText { list_id, text }));
        }
        Some(FieldEvent::Submit) => {
            let effect = update(app, Action::SubmitTask(list_id));
            if effect == Effect::Persist {
                tui.task_input.clear();
            }
            signal.absorb(effect);
        }
        Some(FieldEvent::Moved) | None => {}
    }
}

fn handle_task(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    list_id: ListId,
    task_index: usize,
    signal: &mut LoopSignal,
) {
    let editing = app
        .edit
        .as_ref()
        .is_some_and(|e| e.targets(list_id, task_index));

    if editing {
        match event {
            TuiEvent::Submit => signal.absorb(update(app, Action::SaveEdit)),
            TuiEvent::Escape => signal.absorb(update(app, Action::CancelEdit)),
            _ => {
                if tui.edit_field.handle_event(event) == Some(FieldEvent::Changed) {
                    let text = tui.edit_field.text().to_string();
                    signal.absorb(update(app, Action::SetEditText(text)));
                }
            }
        }
        return;
    }

    match event {
        TuiEvent::InputChar(' ') => {
            signal.absorb(update(app, Action::ToggleTask { list_id, task_index }));
        }
        TuiEvent::Submit | TuiEvent::InputChar('e') => {
            signal.absorb(update(app, Action::StartEditing { list_id, task_index }));
            if let Some(edit) = &app.edit {
                tui.edit_field = TextField::with_text(&edit.edit_text);
            }
        }
        TuiEvent::Remove | TuiEvent::Delete | TuiEvent::InputChar('d') => {
            signal.absorb(update(app, Action::RemoveTask { list_id, task_index }));
        }
        _ => {}
    }
}

fn move_focus(app: &mut App, tui: &mut TuiState, rows: &[Row], delta: isize, signal: &mut LoopSignal) {
    if app.edit.is_some() {
        // Leaving the edited task commits it
        signal.absorb(update(app, Action::SaveEdit));
    }
    tui.focus.step(rows, delta);
    tui.board.follow_focus = true;
}

/// Re-anchor focus after the rows may have changed, and load the add-task
/// field when focus lands on a different input row.
fn sync_focus(app: &App, tui: &mut TuiState) {
    let rows = focus::rows(app.store.lists());
    let row = tui.focus.resolve(&rows);
    if let Row::TaskInput(list_id) = row {
        let buffered = app
            .store
            .get(list_id)
            .map(|l| l.new_task_text.as_str())
            .unwrap_or_default();
        if tui.task_input.text() != buffered {
            tui.task_input = TextField::with_text(buffered);
        }
    }
}
