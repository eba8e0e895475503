//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status bar with language, theme and status
//! - `SearchBar`: Bottom query line (the query lives in core)
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state in `TuiState`, transient render wrapper per frame:
//! - `NavigationMenu`: Section/subsection tree
//! - `ContentView`: Scrollable pane for the resolved content unit
//! - `SearchResults`: Centered overlay listing matching nerves
//!
//! Components receive external data as "props" (function parameters), not by
//! reading global state:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! NavigationMenu::new(&mut tui.menu, app.navigation(), &app.translator, palette, focused)
//!     .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (Top status bar)
//! ├── navigation_menu.rs  (Left menu tree)
//! ├── content_view.rs     (Right content pane)
//! ├── search_bar.rs       (Bottom query line)
//! └── search_results.rs   (Results overlay)
//! ```

pub mod content_view;
pub mod navigation_menu;
pub mod search_bar;
pub mod search_results;
mod title_bar;

pub use content_view::{ContentEvent, ContentTarget, ContentView, ContentViewState};
pub use navigation_menu::{MenuEvent, MenuRow, NavigationMenu, NavigationMenuState};
pub use search_bar::SearchBar;
pub use search_results::{SearchResults, SearchResultsEvent, SearchResultsState};
pub use title_bar::TitleBar;
