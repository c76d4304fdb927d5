pub mod commit;
pub mod diff;

pub use commit::*;
pub use diff::*;
