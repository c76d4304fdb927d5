use crate::models::{GitRef, RefType};
use anyhow::Result;
use git2::Repository;
use std::collections::HashMap;

/// Labels per commit id: every reference peeled to its commit, plus `HEAD`
/// when it is detached. Each list is ordered HEAD, local branches, remote
/// branches, tags, everything else.
pub fn load_ref_labels(repo: &Repository) -> Result<HashMap<String, Vec<GitRef>>> {
    let mut labels: HashMap<String, Vec<GitRef>> = HashMap::new();

    for reference in repo.references()? {
        let reference = reference?;
        let Some(full_name) = reference.name() else {
            continue;
        };
        match reference.peel_to_commit() {
            Ok(commit) => {
                let target = commit.id().to_string();
                labels
                    .entry(target.clone())
                    .or_default()
                    .push(GitRef::new(full_name, target));
            }
            Err(e) => tracing::debug!("Skipping reference {}: {}", full_name, e.message()),
        }
    }

    if repo.head_detached().unwrap_or(false) {
        if let Ok(commit) = repo.head().and_then(|head| head.peel_to_commit()) {
            let target = commit.id().to_string();
            labels
                .entry(target.clone())
                .or_default()
                .push(GitRef::new("HEAD", target));
        }
    }

    for refs in labels.values_mut() {
        refs.sort_by(|a, b| {
            display_rank(a.ref_type)
                .cmp(&display_rank(b.ref_type))
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    tracing::debug!("Loaded labels for {} commits", labels.len());
    Ok(labels)
}

fn display_rank(ref_type: RefType) -> u8 {
    match ref_type {
        RefType::Head => 0,
        RefType::LocalBranch => 1,
        RefType::RemoteBranch => 2,
        RefType::Tag => 3,
        RefType::Other => 4,
    }
}
