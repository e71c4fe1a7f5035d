//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields, built fresh each frame:
//! - `TitleBar`: list count, open task count and status message
//! - `ListCard`: one list as a bordered card (tasks, add row, delete hint)
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `TextField`: single-line text input behind every editable row
//! - `ListBoard` / `BoardState`: scrollable column of cards that follows focus
//!
//! Each component file holds its own types, rendering, event handling and
//! tests. Props come in as fields rather than being read from `App`, so a
//! component can be rendered against a `TestBackend` with hand-built data.

pub mod list_board;
pub mod list_card;
pub mod text_field;
mod title_bar;

pub use list_board::{BoardState, ListBoard};
pub use list_card::ListCard;
pub use text_field::{FieldEvent, TextField};
pub use title_bar::TitleBar;
