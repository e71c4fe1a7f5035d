//! # Core Application Logic
//!
//! This module contains Tally's business logic.
//! It knows nothing about any specific UI technology or storage backend.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ListStore (lists)    │
//!                    │  • EditSession          │
//!                    │  • Action + update()    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │  Storage   │
//!           │  Adapter   │              │ SaveQueue  │
//!           │ (ratatui)  │              │  (tokio)   │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`model`]: `TodoList` and `Task`, also the persisted layout
//! - [`store`]: `ListStore`, the only code that mutates lists
//! - [`edit`]: the single-task edit session
//! - [`ids`]: injectable list id generation
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: layered settings

pub mod action;
pub mod config;
pub mod edit;
pub mod ids;
pub mod model;
pub mod state;
pub mod store;
