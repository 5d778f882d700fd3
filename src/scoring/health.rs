//! Weighted health scorer
//!
//! Combines the analyzer outputs with the VCS and dependency summaries.
//! Each category starts at [`CATEGORY_MAX`] and only loses points; raw
//! deductions may overshoot and are floored at 0 per category.

use crate::models::{
    DepsSummary, FileAnalysisResult, Grade, HealthBreakdown, HealthScore, LocResult, TodoResult,
    VcsSummary,
};
use tracing::debug;

pub const CATEGORY_MAX: i32 = 25;
pub const MAX_ISSUES: usize = 10;
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Files above this many lines count as large.
const LARGE_FILE_LINES: usize = 500;
const LARGE_FILE_PENALTY: i32 = 2;
const LARGE_FILE_PENALTY_CAP: i32 = 10;

const LOW_COMMENT_RATIO: f64 = 0.05;
const HIGH_COMMENT_RATIO: f64 = 0.5;
const UNDOCUMENTED_RATIO: f64 = 0.1;

const CRITICAL_TODO_LIMIT: usize = 5;
const OUTDATED_DEPS_LIMIT: usize = 10;
const RECENT_COMMITS_LOW: usize = 5;
const SOLO_COMMITS_LIMIT: usize = 50;

/// Issues and recommendations in the order their deductions fired.
#[derive(Default)]
struct Findings {
    issues: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    fn with_advice(&mut self, issue: impl Into<String>, advice: &str) {
        self.issues.push(issue.into());
        self.recommendations.push(advice.to_string());
    }
}

/// Scores one scan. Construct with the five inputs, then [`calculate`].
///
/// [`calculate`]: HealthScorer::calculate
pub struct HealthScorer<'a> {
    loc: &'a LocResult,
    files: &'a FileAnalysisResult,
    todos: &'a TodoResult,
    git: &'a VcsSummary,
    deps: &'a DepsSummary,
}

impl<'a> HealthScorer<'a> {
    pub fn new(
        loc: &'a LocResult,
        files: &'a FileAnalysisResult,
        todos: &'a TodoResult,
        git: &'a VcsSummary,
        deps: &'a DepsSummary,
    ) -> Self {
        Self {
            loc,
            files,
            todos,
            git,
            deps,
        }
    }

    pub fn calculate(&self) -> HealthScore {
        let mut findings = Findings::default();
        let comment_ratio = self.loc.totals.comment_ratio();

        let code_quality = floor(self.code_quality(comment_ratio, &mut findings));
        let maintenance = floor(self.maintenance(&mut findings));
        let documentation = floor(self.documentation(comment_ratio, &mut findings));
        let activity = floor(self.activity(&mut findings));

        let breakdown = HealthBreakdown {
            code_quality,
            maintenance,
            documentation,
            activity,
        };
        let score = breakdown.total();

        debug!(
            "Health: quality={} maintenance={} docs={} activity={} -> {}",
            code_quality, maintenance, documentation, activity, score
        );

        findings.issues.truncate(MAX_ISSUES);
        findings.recommendations.truncate(MAX_RECOMMENDATIONS);

        HealthScore {
            grade: Grade::from_score(score),
            score,
            breakdown,
            issues: findings.issues,
            recommendations: findings.recommendations,
        }
    }

    fn code_quality(&self, comment_ratio: f64, findings: &mut Findings) -> i32 {
        let mut score = CATEGORY_MAX;

        // Only the ranked list is visible here, so at most top-N files count.
        let large = self
            .files
            .largest_files
            .iter()
            .filter(|f| f.lines > LARGE_FILE_LINES)
            .count();
        if large > 0 {
            score -= (large as i32 * LARGE_FILE_PENALTY).min(LARGE_FILE_PENALTY_CAP);
            findings.with_advice(
                format!("{large} files with >{LARGE_FILE_LINES} lines"),
                "Consider splitting large files into smaller modules",
            );
        }

        if comment_ratio < LOW_COMMENT_RATIO {
            score -= 5;
            findings.with_advice(
                "Very few comments in codebase",
                "Add more documentation comments",
            );
        } else if comment_ratio > HIGH_COMMENT_RATIO {
            score -= 3;
            findings.issue("Excessive comments (may indicate commented-out code)");
        }

        score
    }

    fn maintenance(&self, findings: &mut Findings) -> i32 {
        let mut score = CATEGORY_MAX;

        let total = self.todos.total;
        if total > 50 {
            score -= 15;
            findings.with_advice(
                format!("{total} TODOs/FIXMEs - high tech debt"),
                "Address TODO items to reduce tech debt",
            );
        } else if total > 20 {
            score -= 8;
            findings.issue(format!("{total} TODOs/FIXMEs"));
        } else if total > 10 {
            score -= 4;
        }

        // Counted over the recorded items, which are capped.
        let critical = self
            .todos
            .items
            .iter()
            .filter(|t| t.kind.is_critical())
            .count();
        if critical > CRITICAL_TODO_LIMIT {
            score -= 5;
            findings.with_advice(
                format!("{critical} critical issues (FIXME/BUG)"),
                "Prioritize fixing BUG and FIXME items",
            );
        }

        if self.deps.total_deps > 0 {
            if !self.deps.has_lockfile {
                score -= 5;
                findings.with_advice(
                    "No lockfile found",
                    "Add a lockfile (package-lock.json) for reproducible builds",
                );
            }
            if self.deps.outdated_count > OUTDATED_DEPS_LIMIT {
                score -= 5;
                findings.with_advice(
                    format!("{} outdated dependencies", self.deps.outdated_count),
                    "Update outdated dependencies",
                );
            }
        }

        score
    }

    fn documentation(&self, comment_ratio: f64, findings: &mut Findings) -> i32 {
        let mut score = CATEGORY_MAX;

        if !self.loc.has_language("Markdown") {
            score -= 10;
            findings.with_advice("No markdown documentation found", "Add a README.md file");
        }
        if comment_ratio < UNDOCUMENTED_RATIO {
            score -= 5;
        }

        score
    }

    fn activity(&self, findings: &mut Findings) -> i32 {
        let mut score = CATEGORY_MAX;

        if !self.git.is_repository {
            score -= 15;
            findings.with_advice("Not a git repository", "Initialize git for version control");
            return score;
        }

        let recent = self.git.recent_commits();
        if recent == 0 {
            score -= 10;
            findings.with_advice(
                "No commits in the last 30 days",
                "Repository appears inactive",
            );
        } else if recent < RECENT_COMMITS_LOW {
            score -= 5;
            findings.issue("Low commit activity in the last 30 days");
        }

        if self.git.contributors.len() == 1 && self.git.total_commits > SOLO_COMMITS_LIMIT {
            score -= 3;
            findings.issue("Single contributor on a large project");
        }

        score
    }
}

fn floor(score: i32) -> u32 {
    score.max(0) as u32
}

/// Score a scan from its five inputs.
pub fn calculate_health_score(
    loc: &LocResult,
    files: &FileAnalysisResult,
    todos: &TodoResult,
    git: &VcsSummary,
    deps: &DepsSummary,
) -> HealthScore {
    HealthScorer::new(loc, files, todos, git, deps).calculate()
}
