use crate::graph::CommitSource;
use crate::models::{GitCommit, GitRef};
use anyhow::Result;
use git2::{Odb, Oid, Repository, Revwalk, Sort};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Commits of a repository, newest first and never before their children,
/// read lazily from a libgit2 revision walk.
pub struct RepoWalk<'r> {
    repo: &'r Repository,
    revwalk: Revwalk<'r>,
    odb: Odb<'r>,
    labels: HashMap<String, Vec<GitRef>>,
}

impl<'r> RepoWalk<'r> {
    /// Start at every reference and at HEAD
    pub fn new(repo: &'r Repository, labels: HashMap<String, Vec<GitRef>>) -> Result<Self> {
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_glob("refs/*")?;
        if let Err(e) = revwalk.push_head() {
            debug!("HEAD not pushed: {}", e.message());
        }

        Ok(Self {
            repo,
            revwalk,
            odb: repo.odb()?,
            labels,
        })
    }

    pub fn labels(&self) -> &HashMap<String, Vec<GitRef>> {
        &self.labels
    }
}

impl CommitSource for RepoWalk<'_> {
    fn next_commit(&mut self) -> Option<GitCommit> {
        for oid in self.revwalk.by_ref() {
            let oid = match oid {
                Ok(oid) => oid,
                Err(e) => {
                    warn!("Revision walk stopped: {}", e.message());
                    return None;
                }
            };
            match self
                .repo
                .find_commit(oid)
                .map_err(anyhow::Error::from)
                .and_then(|commit| GitCommit::new(&commit))
            {
                Ok(commit) => return Some(commit),
                Err(e) => warn!("Skipping unreadable commit {}: {}", oid, e),
            }
        }
        None
    }

    fn refs_for(&self, id: &str) -> Vec<GitRef> {
        self.labels.get(id).cloned().unwrap_or_default()
    }

    fn is_known(&self, id: &str) -> bool {
        Oid::from_str(id).map(|oid| self.odb.exists(oid)).unwrap_or(false)
    }
}
