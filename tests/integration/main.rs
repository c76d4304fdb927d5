//! Integration tests against real repositories created with the git CLI

use histgraph::git::{GitRepository, StatusKind};
use histgraph::graph::{PlotCommitList, DEFAULT_FILL_LIMIT};
use histgraph::models::{ChangeType, EditType, RefType};
use histgraph::render::text::render_to_string;
use histgraph::state::{AppConfig, AppState};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

mod test_utils {
    use super::*;
    use std::process::Command;

    const EPOCH: i64 = 1_700_000_000;

    pub struct TestRepo {
        pub dir: TempDir,
        clock: i64,
    }

    impl TestRepo {
        pub fn new() -> anyhow::Result<Self> {
            let dir = TempDir::new()?;
            let repo = Self { dir, clock: 0 };
            repo.git(&["init", "-b", "main"])?;
            repo.git(&["config", "user.name", "Test User"])?;
            repo.git(&["config", "user.email", "test@example.com"])?;
            Ok(repo)
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        pub fn git(&self, args: &[&str]) -> anyhow::Result<String> {
            let date = format!("{} +0000", EPOCH + self.clock * 60);
            let output = Command::new("git")
                .args(args)
                .current_dir(self.path())
                .env("GIT_AUTHOR_DATE", &date)
                .env("GIT_COMMITTER_DATE", &date)
                .output()?;
            anyhow::ensure!(
                output.status.success(),
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }

        /// Write `content` to `file` and commit it, one minute after the
        /// previous commit
        pub fn commit_file(&mut self, file: &str, content: &[u8], message: &str) -> anyhow::Result<String> {
            std::fs::write(self.path().join(file), content)?;
            self.git(&["add", file])?;
            self.clock += 1;
            self.git(&["commit", "-m", message])?;
            self.git(&["rev-parse", "HEAD"])
        }

        pub fn merge(&mut self, branch: &str, message: &str) -> anyhow::Result<String> {
            self.clock += 1;
            self.git(&["merge", "--no-ff", branch, "-m", message])?;
            self.git(&["rev-parse", "HEAD"])
        }
    }

    pub struct BranchRepo {
        pub repo: TestRepo,
        pub initial: String,
        pub feature_1: String,
        pub feature_2: String,
        pub main_update: String,
        pub merge: String,
    }

    /// main: initial -- main_update -- merge
    ///              \                 /
    /// feature:      feature_1 -- feature_2
    pub fn branch_repo() -> anyhow::Result<BranchRepo> {
        let mut repo = TestRepo::new()?;
        let initial = repo.commit_file("README.md", b"hello\n", "Initial commit")?;
        repo.git(&["tag", "v1.0"])?;

        repo.git(&["checkout", "-b", "feature"])?;
        let feature_1 = repo.commit_file("feature.txt", b"one\ntwo\nthree\n", "Add feature")?;
        let feature_2 = repo.commit_file("feature.txt", b"one\n2\nthree\n", "Fix feature")?;

        repo.git(&["checkout", "main"])?;
        let main_update = repo.commit_file("README.md", b"hello\nworld\n", "Update readme")?;
        let merge = repo.merge("feature", "Merge feature")?;

        Ok(BranchRepo {
            repo,
            initial,
            feature_1,
            feature_2,
            main_update,
            merge,
        })
    }

    pub fn plot(path: &Path, limit: usize) -> anyhow::Result<PlotCommitList> {
        let repo = GitRepository::discover(path)?;
        let mut walk = repo.walk()?;
        Ok(PlotCommitList::build(&mut walk, limit))
    }
}

mod history_tests {
    use super::test_utils::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_branch_and_merge_layout() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let list = plot(setup.repo.path(), DEFAULT_FILL_LIMIT)?;

        assert_eq!(list.len(), 5);
        assert!(list.is_complete());

        let order: Vec<&str> = list.iter().map(|c| c.id()).collect();
        assert_eq!(order[0], setup.merge);
        assert_eq!(order[4], setup.initial);
        for (row, commit) in list.iter().enumerate() {
            assert_eq!(commit.row, row);
            for parent in &commit.commit.parent_ids {
                let parent_row = order.iter().position(|id| id == parent).unwrap();
                assert!(parent_row > row, "parent plotted above child");
            }
            assert!(!commit.passing_lanes.contains(&commit.lane));
            assert!(!commit.boundary);
        }

        let merge = list.find(&setup.merge).unwrap();
        assert!(merge.is_merge());
        assert_eq!(merge.parent_lanes.len(), 2);
        assert_eq!(merge.parent_lanes[0], merge.lane);

        let main_update = list.find(&setup.main_update).unwrap();
        let feature_2 = list.find(&setup.feature_2).unwrap();
        assert_eq!(main_update.lane, merge.lane);
        assert_ne!(feature_2.lane, merge.lane);

        let initial = list.find(&setup.initial).unwrap();
        assert!(initial.parent_lanes.is_empty());
        assert_eq!(initial.child_lanes.len(), 2);
        assert_eq!(list.lane_count(), 2);
        Ok(())
    }

    #[test]
    fn test_ref_labels() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let list = plot(setup.repo.path(), DEFAULT_FILL_LIMIT)?;

        let names = |id: &str| -> Vec<(String, RefType)> {
            list.find(id)
                .unwrap()
                .refs
                .iter()
                .map(|r| (r.name.clone(), r.ref_type))
                .collect()
        };

        assert_eq!(names(&setup.merge), vec![("main".to_string(), RefType::LocalBranch)]);
        assert_eq!(names(&setup.feature_2), vec![("feature".to_string(), RefType::LocalBranch)]);
        assert_eq!(names(&setup.initial), vec![("v1.0".to_string(), RefType::Tag)]);
        assert!(names(&setup.feature_1).is_empty());
        Ok(())
    }

    #[test]
    fn test_detached_head_is_labelled() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        setup.repo.git(&["checkout", "--detach", &setup.feature_1])?;
        let list = plot(setup.repo.path(), DEFAULT_FILL_LIMIT)?;

        let refs = &list.find(&setup.feature_1).unwrap().refs;
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].ref_type, RefType::Head);
        Ok(())
    }

    #[test]
    fn test_fill_limit_cuts_history() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let list = plot(setup.repo.path(), 2)?;

        assert_eq!(list.len(), 2);
        assert!(!list.is_complete());
        assert!(list.iter().all(|c| c.boundary));
        assert!(list.iter().all(|c| !c.parent_lanes.is_empty()));
        Ok(())
    }

    #[test]
    fn test_shallow_clone_boundary_follows_missing_parents() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let clone_dir = TempDir::new()?;
        let clone_path = clone_dir.path().join("shallow");
        let url = format!("file://{}", setup.repo.path().display());
        setup.repo.git(&[
            "clone",
            "--depth",
            "2",
            "--branch",
            "main",
            "--single-branch",
            &url,
            clone_path.to_str().unwrap(),
        ])?;

        let list = plot(&clone_path, DEFAULT_FILL_LIMIT)?;
        assert_eq!(list.get(0).unwrap().id(), setup.merge);
        assert!(list.find(&setup.initial).is_none());

        for commit in &list {
            let cut = commit
                .commit
                .parent_ids
                .iter()
                .any(|p| list.find(p).is_none());
            assert_eq!(commit.boundary, cut, "boundary flag of {}", commit.commit.summary);
        }
        Ok(())
    }

    #[test]
    fn test_text_render_of_repository() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let list = plot(setup.repo.path(), DEFAULT_FILL_LIMIT)?;
        let text = render_to_string(&list);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with('*'));
        assert!(lines[0].contains("(main)"));
        assert!(lines[0].ends_with("Merge feature"));
        assert!(lines[8].contains("(v1.0)"));
        assert!(lines[8].ends_with("Initial commit"));
        Ok(())
    }
}

mod diff_tests {
    use super::test_utils::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_commit_changes_against_first_parent() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let repo = GitRepository::discover(setup.repo.path())?;

        let changes = repo.commit_changes(None, &setup.feature_2)?;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "feature.txt");
        assert_eq!(changes[0].change_type, ChangeType::Modified);

        let diff = repo.change_diff(&changes[0], 1024 * 1024)?;
        let edits: Vec<EditType> = diff.sections().iter().map(|s| s.edit).collect();
        assert_eq!(edits, vec![EditType::Unchanged, EditType::Replaced, EditType::Unchanged]);
        assert_eq!(diff.sections()[1].text_a, "two\n");
        assert_eq!(diff.sections()[1].text_b, "2\n");
        Ok(())
    }

    #[test]
    fn test_root_commit_adds_everything() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let repo = GitRepository::discover(setup.repo.path())?;

        let changes = repo.commit_changes(None, &setup.initial)?;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert!(changes[0].old_blob.is_none());

        let diff = repo.change_diff(&changes[0], 1024)?;
        assert_eq!(diff.line_counts(), (0, 1));
        Ok(())
    }

    #[test]
    fn test_explicit_range_and_size_limit() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let repo = GitRepository::discover(setup.repo.path())?;

        let changes = repo.commit_changes(Some(&setup.initial), &setup.merge)?;
        let mut paths: Vec<&str> = changes.iter().map(|c| c.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["README.md", "feature.txt"]);

        let readme = changes.iter().find(|c| c.path == "README.md").unwrap();
        let diff = repo.change_diff(readme, 4)?;
        assert!(diff.sections().iter().any(|s| s.text_b.starts_with("File too large")));
        Ok(())
    }

    #[test]
    fn test_oversized_blobs_report_their_sizes() -> anyhow::Result<()> {
        let mut test_repo = TestRepo::new()?;
        test_repo.commit_file("big.txt", &[b'a'; 64], "Small")?;
        let id = test_repo.commit_file("big.txt", &[b'b'; 100], "Larger")?;
        let repo = GitRepository::discover(test_repo.path())?;

        let changes = repo.commit_changes(None, &id)?;
        let diff = repo.change_diff(&changes[0], 80)?;
        let side_a: String = diff.sections().iter().map(|s| s.text_a.as_str()).collect();
        let side_b: String = diff.sections().iter().map(|s| s.text_b.as_str()).collect();
        assert_eq!(side_a, "File too large\nFile size: 64");
        assert_eq!(side_b, "File too large\nFile size: 100");

        let within = repo.change_diff(&changes[0], 100)?;
        assert_eq!(within.line_counts(), (1, 1));
        Ok(())
    }

    #[test]
    fn test_binary_blob_is_summarized() -> anyhow::Result<()> {
        let mut test_repo = TestRepo::new()?;
        test_repo.commit_file("data.bin", b"text\n", "Text first")?;
        let id = test_repo.commit_file("data.bin", b"bin\0ary", "Now binary")?;
        let repo = GitRepository::discover(test_repo.path())?;

        let changes = repo.commit_changes(None, &id)?;
        let diff = repo.change_diff(&changes[0], 1024)?;
        let section = &diff.sections()[0];
        assert_eq!(section.text_a, "text\n");
        assert_eq!(section.text_b, "Binary content\nFile size: 7");
        Ok(())
    }

    #[test]
    fn test_invalid_commit_id_is_rejected() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let repo = GitRepository::discover(setup.repo.path())?;
        assert!(repo.commit_changes(None, "not-a-sha").is_err());
        Ok(())
    }
}

mod app_state_tests {
    use super::test_utils::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn wait_for_status(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.is_scanning() && Instant::now() < deadline {
            state.poll_status();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_open_repository_builds_everything() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        std::fs::write(setup.repo.path().join("scratch.txt"), "wip\n")?;

        let mut state = AppState::new(AppConfig::default());
        state.open_repository(setup.repo.path())?;

        assert_eq!(state.plot.len(), 5);
        assert!(state.scene.dot_for(&setup.merge).is_some());
        assert_eq!(state.config.recent_repositories.len(), 1);

        wait_for_status(&mut state);
        assert!(!state.is_scanning());
        let statuses: Vec<(&str, StatusKind)> =
            state.statuses.iter().map(|s| (s.path.as_str(), s.kind)).collect();
        assert_eq!(statuses, vec![("scratch.txt", StatusKind::Untracked)]);
        Ok(())
    }

    #[test]
    fn test_clicking_a_commit_loads_its_changes() -> anyhow::Result<()> {
        let setup = branch_repo()?;
        let mut state = AppState::new(AppConfig::default());
        state.open_repository(setup.repo.path())?;

        let dot = state.scene.dot_for(&setup.feature_2).unwrap().shape.bounds().center();
        assert!(state.handle_click(dot));

        assert_eq!(state.selected_commit.as_deref(), Some(setup.feature_2.as_str()));
        assert!(state.scene.text_for(&setup.feature_2).unwrap().highlighted);
        assert_eq!(state.changes.len(), 1);

        let change = state.changes[0].clone();
        let diff = state.change_diff(&change).unwrap();
        assert!(diff.has_changes());
        Ok(())
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing: PathBuf = dir.path().join("nothing-here");

        let mut state = AppState::new(AppConfig::default());
        let result = state.open_repository(&missing);
        assert!(result.is_err());
        state.report(&result.unwrap_err(), "opening repository");

        assert!(state.repository.is_none());
        assert!(state.error_message.is_some());
    }
}
