pub mod changes_view;
pub mod history_view;

pub use changes_view::ChangesView;
pub use history_view::HistoryView;
