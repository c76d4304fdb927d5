//! # histgraph
//!
//! Commit history graph layout and rendering for git repositories.
//!
//! Commits arrive newest first from a [`graph::CommitSource`]. The
//! [`graph::LaneAllocator`] gives every commit a lane, [`graph::PlotCommitList`]
//! records the lanes each row draws, and [`graph::plot_instructions`] turns a
//! row into geometry for any [`render::PlotRenderer`]:
//!
//! - [`render::scene::SceneRenderer`] keeps the drawn elements for hit-testing
//! - [`render::painter::PainterRenderer`] paints straight into an `egui::Painter`
//! - [`render::text::TextRenderer`] draws the graph with characters
//!
//! ## Example
//!
//! ```rust,no_run
//! use histgraph::git::GitRepository;
//! use histgraph::graph::{PlotCommitList, DEFAULT_FILL_LIMIT};
//! use histgraph::render::text::render_to_string;
//!
//! # fn main() -> anyhow::Result<()> {
//! let repo = GitRepository::discover(".")?;
//! let mut walk = repo.walk()?;
//! let list = PlotCommitList::build(&mut walk, DEFAULT_FILL_LIMIT);
//! println!("{}", render_to_string(&list));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod git;
pub mod graph;
pub mod models;
pub mod render;
pub mod state;
pub mod ui;

pub use app::HistoryApp;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
