//! Commit graph layout.
//!
//! Commits arrive newest first from a [`CommitSource`]; the [`LaneAllocator`]
//! gives each one a lane in a single pass and [`plot_instructions`] turns a
//! placed commit into draw calls for any renderer.

pub mod lane;
pub mod layout;
pub mod list;
pub mod model;
pub mod plot_commit;
pub mod source;

pub use lane::{LaneAllocator, LanePlacement, PlotLane};
pub use layout::{plot_instructions, DrawInstruction, PlotGeometry};
pub use list::{PlotCommitList, DEFAULT_FILL_LIMIT};
pub use model::{CommitGraph, TopoWalk};
pub use plot_commit::PlotCommit;
pub use source::CommitSource;
