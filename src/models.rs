//! Core data models for codestat
//!
//! These models are shared by the analyzers, the health scorer and the
//! reporters. Everything here is plain data: analyzers build it once and
//! nothing mutates it after the scan finishes.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A file found by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the scan root, always `/`-separated
    pub relative_path: String,
    /// Extension including the leading dot, empty when there is none
    pub extension: String,
    /// Language label assigned from the extension ("Other" when unknown)
    pub language: String,
    /// Size in bytes
    pub size: u64,
}

/// Line tally for a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub code: usize,
    pub comments: usize,
    pub blank: usize,
    pub total: usize,
}

/// Line tally rolled up for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    pub language: String,
    pub files: usize,
    pub code: usize,
    pub comments: usize,
    pub blank: usize,
    pub total: usize,
}

impl LanguageStats {
    /// Stats for the first file seen in a language.
    pub fn new(language: &str, result: ParseResult) -> Self {
        Self {
            language: language.to_string(),
            files: 1,
            code: result.code,
            comments: result.comments,
            blank: result.blank,
            total: result.total,
        }
    }

    /// Fold another file of the same language into these stats.
    pub fn add(&mut self, result: ParseResult) {
        self.files += 1;
        self.code += result.code;
        self.comments += result.comments;
        self.blank += result.blank;
        self.total += result.total;
    }
}

/// Grand totals across every language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LocTotals {
    pub files: usize,
    pub code: usize,
    pub comments: usize,
    pub blank: usize,
    pub total: usize,
}

impl LocTotals {
    pub fn from_languages(languages: &[LanguageStats]) -> Self {
        languages.iter().fold(Self::default(), |acc, lang| Self {
            files: acc.files + lang.files,
            code: acc.code + lang.code,
            comments: acc.comments + lang.comments,
            blank: acc.blank + lang.blank,
            total: acc.total + lang.total,
        })
    }

    /// Comment lines per code line. Code is floored at 1 so an empty tree
    /// yields 0.0 rather than NaN.
    pub fn comment_ratio(&self) -> f64 {
        self.comments as f64 / self.code.max(1) as f64
    }
}

/// Output of the LOC aggregator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocResult {
    /// Sorted by code lines, descending
    pub by_language: Vec<LanguageStats>,
    pub totals: LocTotals,
}

impl LocResult {
    pub fn has_language(&self, language: &str) -> bool {
        self.by_language.iter().any(|l| l.language == language)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestFile {
    pub path: String,
    pub lines: usize,
    pub size: u64,
}

/// File and line counts for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    /// Directory of the relative path; the scan root is the empty string
    #[serde(serialize_with = "serialize_folder")]
    pub path: String,
    pub file_count: usize,
    pub total_lines: usize,
}

impl FolderStats {
    /// Path as shown to users: the root folder renders as ".".
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "."
        } else {
            &self.path
        }
    }
}

fn serialize_folder<S: Serializer>(path: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if path.is_empty() { "." } else { path })
}

/// Output of the file/folder analyzer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileAnalysisResult {
    pub largest_files: Vec<LargestFile>,
    pub folder_stats: Vec<FolderStats>,
    /// Every discovered file, including ones that could not be read
    pub total_files: usize,
    /// Bytes across readable files only
    pub total_size: u64,
}

/// Marker keywords, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TodoKind {
    Todo,
    Fixme,
    Hack,
    Xxx,
    Bug,
    Note,
}

impl TodoKind {
    pub const ALL: [TodoKind; 6] = [
        TodoKind::Todo,
        TodoKind::Fixme,
        TodoKind::Hack,
        TodoKind::Xxx,
        TodoKind::Bug,
        TodoKind::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoKind::Todo => "TODO",
            TodoKind::Fixme => "FIXME",
            TodoKind::Hack => "HACK",
            TodoKind::Xxx => "XXX",
            TodoKind::Bug => "BUG",
            TodoKind::Note => "NOTE",
        }
    }

    /// FIXME, BUG and XXX mark known defects rather than plans.
    pub fn is_critical(&self) -> bool {
        matches!(self, TodoKind::Fixme | TodoKind::Bug | TodoKind::Xxx)
    }
}

impl std::fmt::Display for TodoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    #[serde(rename = "type")]
    pub kind: TodoKind,
    pub text: String,
    pub file: String,
    /// 1-based
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTodoCount {
    pub file: String,
    pub count: usize,
}

/// Output of the todo scanner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoResult {
    /// First recorded items only (see `todos::MAX_ITEMS`)
    pub items: Vec<TodoItem>,
    /// Counts over every match, not just `items`
    pub by_type: BTreeMap<TodoKind, usize>,
    pub by_file: Vec<FileTodoCount>,
    /// Every match, not just `items`
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub commits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChurn {
    pub file: String,
    /// Distinct commits touching the file
    pub changes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitActivity {
    /// `YYYY-MM-DD`
    pub date: String,
    pub commits: usize,
}

/// Version-control signals. The default value means "not a repository".
#[derive(Debug, Clone, Default, Serialize)]
pub struct VcsSummary {
    pub is_repository: bool,
    pub total_commits: usize,
    pub contributors: Vec<Contributor>,
    pub file_churn: Vec<FileChurn>,
    /// One entry per day with commits in the trailing 30 days, ascending
    pub recent_activity: Vec<CommitActivity>,
    pub first_commit: Option<String>,
    pub last_commit: Option<String>,
    pub branches: usize,
}

impl VcsSummary {
    pub fn recent_commits(&self) -> usize {
        self.recent_activity.iter().map(|a| a.commits).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Cargo,
    #[default]
    Unknown,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Yarn => write!(f, "yarn"),
            PackageManager::Pnpm => write!(f, "pnpm"),
            PackageManager::Cargo => write!(f, "cargo"),
            PackageManager::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Prod,
    Dev,
    Peer,
    Optional,
    Build,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub kind: DependencyKind,
    pub latest: Option<String>,
    pub outdated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DependencyCounts {
    pub prod: usize,
    pub dev: usize,
    pub peer: usize,
    pub optional: usize,
    pub build: usize,
}

/// Dependency signals. The default value means "no manifest found".
#[derive(Debug, Clone, Default, Serialize)]
pub struct DepsSummary {
    pub package_manager: PackageManager,
    pub has_lockfile: bool,
    pub dependencies: Vec<Dependency>,
    pub total_deps: usize,
    pub outdated_count: usize,
    pub summary: DependencyCounts,
}

/// Letter grade for the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => Grade::A,
            s if s >= 75 => Grade::B,
            s if s >= 60 => Grade::C,
            s if s >= 40 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Per-category scores, each in `0..=25`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthBreakdown {
    pub code_quality: u32,
    pub maintenance: u32,
    pub documentation: u32,
    pub activity: u32,
}

impl HealthBreakdown {
    pub fn total(&self) -> u32 {
        self.code_quality + self.maintenance + self.documentation + self.activity
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthScore {
    pub grade: Grade,
    /// 0-100
    pub score: u32,
    pub breakdown: HealthBreakdown,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Everything a reporter needs for one scan.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    pub loc: LocResult,
    pub files: FileAnalysisResult,
    pub todos: TodoResult,
    pub git: VcsSummary,
    pub deps: DepsSummary,
    pub health: HealthScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(75), Grade::B);
        assert_eq!(Grade::from_score(74), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::C);
        assert_eq!(Grade::from_score(59), Grade::D);
        assert_eq!(Grade::from_score(40), Grade::D);
        assert_eq!(Grade::from_score(39), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_root_folder_displays_as_dot() {
        let root = FolderStats {
            path: String::new(),
            file_count: 2,
            total_lines: 10,
        };
        assert_eq!(root.display_path(), ".");
        let json = serde_json::to_value(&root).expect("serialize folder");
        assert_eq!(json["path"], ".");

        let nested = FolderStats {
            path: "src/cli".into(),
            file_count: 1,
            total_lines: 3,
        };
        assert_eq!(nested.display_path(), "src/cli");
    }

    #[test]
    fn test_todo_kind_serializes_uppercase() {
        let item = TodoItem {
            kind: TodoKind::Fixme,
            text: "leak".into(),
            file: "a.rs".into(),
            line: 3,
        };
        let json = serde_json::to_value(&item).expect("serialize item");
        assert_eq!(json["type"], "FIXME");
        assert!(TodoKind::Xxx.is_critical());
        assert!(!TodoKind::Note.is_critical());
    }

    #[test]
    fn test_comment_ratio_floors_code_at_one() {
        let totals = LocTotals {
            comments: 3,
            ..Default::default()
        };
        assert!((totals.comment_ratio() - 3.0).abs() < f64::EPSILON);
        assert_eq!(LocTotals::default().comment_ratio(), 0.0);
    }
}
