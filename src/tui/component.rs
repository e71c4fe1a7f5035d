use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that draws itself into a `Rect`.
///
/// Components receive their data as struct fields ("props"), borrowed from
/// `App` or `TuiState` for the duration of one frame. They never reach for
/// state they were not handed.
///
/// `render` takes `&mut self` so stateful wrappers can update scroll offsets
/// or cached measurements while drawing, the same way ratatui's
/// `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes low-level `TuiEvent`s.
pub trait EventHandler {
    /// What the component reports back to the event loop.
    type Event;

    /// Returns `None` when the event was ignored or needs no follow-up.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
