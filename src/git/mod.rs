pub mod diff;
pub mod error_handling;
pub mod references;
pub mod repository;
pub mod status;
pub mod walk;

pub use diff::{is_binary, TextDiff};
pub use error_handling::{ErrorRecovery, ErrorReporter, GitError};
pub use references::load_ref_labels;
pub use repository::{GitRepository, RepositoryInfo};
pub use status::{PathStatus, StatusKind, StatusScan};
pub use walk::RepoWalk;
