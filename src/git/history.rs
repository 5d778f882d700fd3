//! Git history extraction using libgit2
//!
//! Walks HEAD once and derives everything the report needs: commit and
//! contributor counts, per-file churn, recent daily activity and the
//! first/last commit dates.

use crate::analysis::effective_top_n;
use crate::models::{CommitActivity, Contributor, FileChurn, VcsSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use git2::{Commit, DiffFindOptions, Repository, Sort};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_TOP_GIT: usize = 10;

/// Days counted as "recent" activity.
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Git history analyzer using libgit2.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository containing `path` (the path may be a subdirectory).
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Summarize history as of `now`. Lists are truncated to `top_n`.
    ///
    /// Errors from libgit2 part-way through are logged and the summary
    /// gathered up to that point is returned.
    pub fn summarize(&self, top_n: usize, now: DateTime<Utc>) -> VcsSummary {
        let mut summary = VcsSummary {
            is_repository: true,
            ..Default::default()
        };

        match self.repo.branches(None) {
            Ok(branches) => summary.branches = branches.flatten().count(),
            Err(e) => warn!("Failed to list branches: {}", e),
        }

        if self.repo.head().is_err() {
            debug!("Repository has no commits yet");
            return summary;
        }

        if let Err(e) = self.walk_head(&mut summary, effective_top_n(top_n, DEFAULT_TOP_GIT), now) {
            warn!("Git history incomplete: {:#}", e);
        }
        summary
    }

    fn walk_head(&self, summary: &mut VcsSummary, top_n: usize, now: DateTime<Utc>) -> Result<()> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let since = now - Duration::days(ACTIVITY_WINDOW_DAYS);

        let mut contributors: HashMap<(String, String), usize> = HashMap::new();
        let mut churn: Vec<FileChurn> = Vec::new();
        let mut churn_index: HashMap<String, usize> = HashMap::new();
        let mut activity: BTreeMap<String, usize> = BTreeMap::new();
        let mut oldest: Option<DateTime<Utc>> = None;
        let mut newest: Option<DateTime<Utc>> = None;

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            summary.total_commits += 1;

            let author = commit.author();
            let key = (
                author.name().unwrap_or("Unknown").to_string(),
                author.email().unwrap_or("").to_string(),
            );
            *contributors.entry(key).or_insert(0) += 1;

            // The window is selected on committer time, like `git log --since`,
            // but the day bucket comes from the author date.
            let committed = git_time(&commit.time());
            if let Some(when) = git_time(&author.when()) {
                oldest = Some(oldest.map_or(when, |o| o.min(when)));
                newest = Some(newest.map_or(when, |n| n.max(when)));
                if committed.is_some_and(|c| c >= since) {
                    *activity.entry(day(when)).or_insert(0) += 1;
                }
            }

            for path in self.changed_files(&commit)? {
                match churn_index.get(&path) {
                    Some(&i) => churn[i].changes += 1,
                    None => {
                        churn_index.insert(path.clone(), churn.len());
                        churn.push(FileChurn {
                            file: path,
                            changes: 1,
                        });
                    }
                }
            }
        }

        let mut contributors: Vec<Contributor> = contributors
            .into_iter()
            .map(|((name, email), commits)| Contributor {
                name,
                email,
                commits,
            })
            .collect();
        contributors.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.name.cmp(&b.name)));
        contributors.truncate(top_n);

        churn.sort_by(|a, b| b.changes.cmp(&a.changes));
        churn.truncate(top_n);

        summary.contributors = contributors;
        summary.file_churn = churn;
        summary.recent_activity = activity
            .into_iter()
            .map(|(date, commits)| CommitActivity { date, commits })
            .collect();
        summary.first_commit = oldest.map(day);
        summary.last_commit = newest.map(day);

        debug!(
            "Git: {} commits, {} contributors, {} recent",
            summary.total_commits,
            summary.contributors.len(),
            summary.recent_commits()
        );
        Ok(())
    }

    /// Paths touched by a commit relative to its first parent. Merge
    /// commits contribute nothing and a rename counts once under its new
    /// name, matching `git log --name-only`.
    fn changed_files(&self, commit: &Commit) -> Result<Vec<String>> {
        if commit.parent_count() > 1 {
            return Ok(Vec::new());
        }

        let parent = commit.parent(0).ok();
        let tree = commit.tree()?;
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

        Ok(diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect())
    }
}

fn git_time(time: &git2::Time) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.seconds(), 0).single()
}

fn day(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Version-control summary for `path`; a non-repository yields the empty summary.
pub fn summarize(path: &Path, top_n: usize) -> VcsSummary {
    match GitHistory::open(path) {
        Ok(history) => history.summarize(top_n, Utc::now()),
        Err(e) => {
            debug!("No git repository: {:#}", e);
            VcsSummary::default()
        }
    }
}
