use crate::git::error_handling::{GitError, InputValidator};
use crate::git::references::load_ref_labels;
use crate::git::walk::RepoWalk;
use crate::models::GitCommit;
use anyhow::Result;
use git2::Repository;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_bare: bool,
    pub head_branch: Option<String>,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
}

impl RepositoryInfo {
    pub fn from_repo(repo: &Repository) -> Result<Self> {
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        let head_branch = repo
            .head()
            .ok()
            .filter(|head| head.is_branch())
            .and_then(|head| head.shorthand().map(|s| s.to_string()));

        let mut branches = Vec::new();
        for branch in repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                branches.push(name.to_string());
            }
        }

        let tags = repo
            .tag_names(None)?
            .iter()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(Self {
            path,
            name,
            is_bare: repo.is_bare(),
            head_branch,
            branches,
            tags,
        })
    }
}

pub struct GitRepository {
    repo: Repository,
    info: RepositoryInfo,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("info", &self.info)
            .finish()
    }
}

impl GitRepository {
    /// Open the repository at exactly `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path.as_ref()).map_err(GitError::from)?;
        Self::from_repo(repo)
    }

    /// Open the repository containing `path`, searching parent directories
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path.as_ref()).map_err(GitError::from)?;
        Self::from_repo(repo)
    }

    fn from_repo(repo: Repository) -> Result<Self> {
        let info = RepositoryInfo::from_repo(&repo)?;
        tracing::info!("Opened repository {} at {}", info.name, info.path.display());
        Ok(Self { repo, info })
    }

    pub fn info(&self) -> &RepositoryInfo {
        &self.info
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Working directory, or the git directory for bare repositories
    pub fn path(&self) -> &Path {
        &self.info.path
    }

    /// Lazy walk over every commit reachable from a ref or HEAD
    pub fn walk(&self) -> Result<RepoWalk<'_>> {
        let labels = load_ref_labels(&self.repo)?;
        RepoWalk::new(&self.repo, labels)
    }

    pub fn get_commit(&self, id: &str) -> Result<GitCommit> {
        InputValidator::validate_commit_id(id)?;
        let commit = self
            .repo
            .revparse_single(id)
            .and_then(|object| object.peel_to_commit())
            .map_err(GitError::from)?;
        GitCommit::new(&commit)
    }
}
