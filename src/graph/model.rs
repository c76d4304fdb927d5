use crate::graph::source::CommitSource;
use crate::models::{GitCommit, GitRef};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// In-memory commit DAG with a parent and child index
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    commits: HashMap<String, GitCommit>,
    children: HashMap<String, Vec<String>>,
    refs: HashMap<String, Vec<GitRef>>,
    /// Insertion order, used when no explicit start points are given
    order: Vec<String>,
}

impl CommitGraph {
    pub fn new(commits: impl IntoIterator<Item = GitCommit>) -> Self {
        let mut graph = CommitGraph::default();

        for commit in commits {
            if graph.commits.contains_key(&commit.id) {
                tracing::debug!("Ignoring duplicate commit {}", commit.id);
                continue;
            }
            graph.order.push(commit.id.clone());
            graph.commits.insert(commit.id.clone(), commit);
        }

        for id in &graph.order {
            let commit = &graph.commits[id];
            let mut seen = HashSet::new();
            for parent in &commit.parent_ids {
                if seen.insert(parent) {
                    graph
                        .children
                        .entry(parent.clone())
                        .or_default()
                        .push(id.clone());
                }
            }
        }

        graph
    }

    /// Attach reference labels, keyed by the commit they point at
    pub fn with_refs(mut self, refs: impl IntoIterator<Item = GitRef>) -> Self {
        for r in refs {
            self.refs.entry(r.target.clone()).or_default().push(r);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commits.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&GitCommit> {
        self.commits.get(id)
    }

    pub fn parents_of(&self, id: &str) -> &[String] {
        self.commits
            .get(id)
            .map(|c| c.parent_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn refs_of(&self, id: &str) -> &[GitRef] {
        self.refs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Commits nothing else in the graph names as a parent
    pub fn tips(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.children_of(id).is_empty())
            .cloned()
            .collect()
    }

    /// Lazily walk everything reachable from `starts` (every tip when empty),
    /// newest first, never yielding a commit before its children.
    pub fn walk(&self, starts: &[&str]) -> TopoWalk<'_> {
        let starts: Vec<String> = if starts.is_empty() {
            self.tips()
        } else {
            starts
                .iter()
                .filter(|id| self.contains(id))
                .map(|id| id.to_string())
                .collect()
        };

        TopoWalk::new(self, starts)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Ready<'g> {
    time: i64,
    id: &'g str,
}

impl Ord for Ready<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Newest first, then smallest id first for a stable order.
        self.time
            .cmp(&other.time)
            .then_with(|| other.id.cmp(self.id))
    }
}

impl PartialOrd for Ready<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-descending topological traversal over a [`CommitGraph`]
#[derive(Debug)]
pub struct TopoWalk<'g> {
    graph: &'g CommitGraph,
    reachable: HashSet<&'g str>,
    pending_children: HashMap<&'g str, usize>,
    ready: BinaryHeap<Ready<'g>>,
}

impl<'g> TopoWalk<'g> {
    fn new(graph: &'g CommitGraph, starts: Vec<String>) -> Self {
        let mut reachable: HashSet<&'g str> = HashSet::new();
        let mut queue: VecDeque<&'g str> = VecDeque::new();

        for start in &starts {
            if let Some((id, _)) = graph.commits.get_key_value(start.as_str()) {
                if reachable.insert(id.as_str()) {
                    queue.push_back(id.as_str());
                }
            }
        }

        while let Some(id) = queue.pop_front() {
            for parent in graph.parents_of(id) {
                if let Some((pid, _)) = graph.commits.get_key_value(parent.as_str()) {
                    if reachable.insert(pid.as_str()) {
                        queue.push_back(pid.as_str());
                    }
                }
            }
        }

        let mut pending_children = HashMap::new();
        for &id in &reachable {
            let count = graph
                .children_of(id)
                .iter()
                .filter(|c| reachable.contains(c.as_str()))
                .count();
            pending_children.insert(id, count);
        }

        let mut ready = BinaryHeap::new();
        for (&id, &count) in &pending_children {
            if count == 0 {
                ready.push(Ready {
                    time: graph.commits[id].committer.when.timestamp(),
                    id,
                });
            }
        }

        Self {
            graph,
            reachable,
            pending_children,
            ready,
        }
    }
}

impl<'g> Iterator for TopoWalk<'g> {
    type Item = &'g GitCommit;

    fn next(&mut self) -> Option<Self::Item> {
        let Ready { id, .. } = self.ready.pop()?;
        let commit = &self.graph.commits[id];

        let mut seen = HashSet::new();
        for parent in &commit.parent_ids {
            if !seen.insert(parent.as_str()) || !self.reachable.contains(parent.as_str()) {
                continue;
            }
            if let Some((pid, _)) = self.graph.commits.get_key_value(parent.as_str()) {
                if let Some(count) = self.pending_children.get_mut(pid.as_str()) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.ready.push(Ready {
                            time: self.graph.commits[pid].committer.when.timestamp(),
                            id: pid.as_str(),
                        });
                    }
                }
            }
        }

        Some(commit)
    }
}

impl CommitSource for TopoWalk<'_> {
    fn next_commit(&mut self) -> Option<GitCommit> {
        self.next().cloned()
    }

    fn refs_for(&self, id: &str) -> Vec<GitRef> {
        self.graph.refs_of(id).to_vec()
    }

    fn is_known(&self, id: &str) -> bool {
        self.graph.contains(id)
    }
}
