use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCommit {
    pub id: String,
    pub short_id: String,
    pub author: GitSignature,
    pub committer: GitSignature,
    pub message: String,
    pub summary: String,
    pub parent_ids: Vec<String>,
    pub tree_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

impl GitSignature {
    pub fn display(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Kind of reference a label points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefType {
    LocalBranch,
    RemoteBranch,
    Tag,
    Head,
    Other,
}

impl RefType {
    /// Classify a full reference name (`refs/heads/main`, `refs/tags/v1`, `HEAD`, ...)
    pub fn classify(full_name: &str) -> Self {
        if full_name == "HEAD" {
            RefType::Head
        } else if full_name.starts_with("refs/heads/") {
            RefType::LocalBranch
        } else if full_name.starts_with("refs/remotes/") {
            RefType::RemoteBranch
        } else if full_name.starts_with("refs/tags/") {
            RefType::Tag
        } else {
            RefType::Other
        }
    }
}

/// A reference (branch, tag, HEAD) resolved to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitRef {
    pub name: String,
    pub full_name: String,
    pub target: String, // commit SHA
    pub ref_type: RefType,
}

impl GitRef {
    pub fn new(full_name: impl Into<String>, target: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let ref_type = RefType::classify(&full_name);
        let name = match ref_type {
            RefType::LocalBranch => full_name.trim_start_matches("refs/heads/"),
            RefType::RemoteBranch => full_name.trim_start_matches("refs/remotes/"),
            RefType::Tag => full_name.trim_start_matches("refs/tags/"),
            RefType::Head | RefType::Other => full_name.as_str(),
        }
        .to_string();

        Self {
            name,
            full_name,
            target: target.into(),
            ref_type,
        }
    }
}

impl GitCommit {
    pub fn new(commit: &git2::Commit) -> anyhow::Result<Self> {
        let id = commit.id().to_string();
        let short_id = commit
            .as_object()
            .short_id()?
            .as_str()
            .unwrap_or("")
            .to_string();

        let author = signature(&commit.author());
        let committer = signature(&commit.committer());

        let message = commit.message().unwrap_or("").to_string();
        let summary = commit.summary().unwrap_or("").to_string();

        let parent_ids = commit.parent_ids().map(|id| id.to_string()).collect();
        let tree_id = commit.tree_id().to_string();

        Ok(GitCommit {
            id,
            short_id,
            author,
            committer,
            message,
            summary,
            parent_ids,
            tree_id,
        })
    }

    /// Build a commit that does not come from a repository.
    ///
    /// `time` is a unix timestamp used for both author and committer, which is
    /// what in-memory graphs order by.
    pub fn synthetic(id: &str, parents: &[&str], time: i64) -> Self {
        let when = DateTime::from_timestamp(time, 0).unwrap_or_default();
        let sig = GitSignature {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            when,
        };

        GitCommit {
            id: id.to_string(),
            short_id: id.chars().take(7).collect(),
            author: sig.clone(),
            committer: sig,
            message: format!("commit {}", id),
            summary: format!("commit {}", id),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            tree_id: String::new(),
        }
    }
}

fn signature(sig: &git2::Signature) -> GitSignature {
    GitSignature {
        name: sig.name().unwrap_or("").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        when: DateTime::from_timestamp(sig.when().seconds(), 0).unwrap_or_else(Utc::now),
    }
}
