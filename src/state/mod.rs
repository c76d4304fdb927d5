pub mod app_state;
pub mod config;
pub mod selection;

pub use app_state::AppState;
pub use config::{AppConfig, DiffSettings, GraphSettings, SelectionMode};
pub use selection::{Selection, SelectionCallbacks, SelectionState, SelectionStrategy};
