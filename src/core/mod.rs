//! # Core Application Logic
//!
//! This module contains NeuroRef's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Catalog (nerve data) │
//!                    │  • Stores (nav/search/  │
//!                    │    settings)            │
//!                    │  • Action + update()    │
//!                    │                         │
//!                    │  No UI. Pure reducer.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    CLI     │
//!             │  Adapter   │          │  --search  │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Nerve records and the validated, region-ordered dataset
//! - [`navigation`]: Section/subsection ids, the menu, and the `Navigator` store
//! - [`search`]: Diacritic-insensitive substring search over the catalog
//! - [`content`]: Maps navigation state to a renderable `ContentUnit`
//! - [`i18n`]: Spanish/English translation tables
//! - [`settings`]: Theme and language preferences, persisted as JSON
//! - [`config`]: `~/.neuroref/config.toml` and override resolution
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer

pub mod action;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod navigation;
pub mod notify;
pub mod search;
pub mod settings;
pub mod state;

pub use action::{Action, Effect, update};
pub use error::{CoreError, Result};
pub use state::App;
