//! Text (terminal) reporter with colors and formatting

use super::format_bytes;
use crate::git::ACTIVITY_WINDOW_DAYS;
use crate::models::{Grade, Report};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::A => "\x1b[32m", // Green
        Grade::B => "\x1b[92m", // Light green
        Grade::C => "\x1b[33m", // Yellow
        Grade::D => "\x1b[91m", // Light red
        Grade::F => "\x1b[31m", // Red
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const RED: &str = "\x1b[31m";

/// Rows shown in the language table
const MAX_LANGUAGES: usize = 15;
/// Rows shown in the folder list
const MAX_FOLDERS: usize = 5;
const MAX_TODO_ITEMS: usize = 5;

/// Render report as formatted terminal output. With `color` off the ANSI
/// escapes are stripped, for files and pipes.
pub fn render(report: &Report, color: bool) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{BOLD}{CYAN}Codebase Statistics: {}{RESET}\n",
        report.project_name
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────────────────{RESET}\n\n"
    ));

    render_overview(report, &mut out);
    render_languages(report, &mut out);
    render_files(report, &mut out);
    render_todos(report, &mut out);
    render_git(report, &mut out);
    render_deps(report, &mut out);
    render_health(report, &mut out);

    if !color {
        return Ok(console::strip_ansi_codes(&out).into_owned());
    }
    Ok(out)
}

fn render_overview(report: &Report, out: &mut String) {
    out.push_str(&format!("{BOLD}OVERVIEW{RESET}\n"));
    out.push_str(&format!(
        "  Total Files:  {}\n",
        format_number(report.files.total_files)
    ));
    out.push_str(&format!(
        "  Total Lines:  {}\n",
        format_number(report.loc.totals.total)
    ));
    out.push_str(&format!(
        "  Total Size:   {}\n",
        format_bytes(report.files.total_size)
    ));
    out.push_str(&format!(
        "  Languages:    {}\n\n",
        report.loc.by_language.len()
    ));
}

fn render_languages(report: &Report, out: &mut String) {
    out.push_str(&format!("{BOLD}LINES OF CODE{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  {:<20} {:>8} {:>10} {:>10} {:>10} {:>10}{RESET}\n",
        "LANGUAGE", "FILES", "CODE", "COMMENTS", "BLANK", "TOTAL"
    ));
    out.push_str(&format!(
        "{DIM}  ─────────────────────────────────────────────────────────────────────────{RESET}\n"
    ));

    for lang in report.loc.by_language.iter().take(MAX_LANGUAGES) {
        out.push_str(&format!(
            "  {YELLOW}{:<20}{RESET} {:>8} {GREEN}{:>10}{RESET} {BLUE}{:>10}{RESET} {DIM}{:>10}{RESET} {:>10}\n",
            truncate(&lang.language, 20),
            format_number(lang.files),
            format_number(lang.code),
            format_number(lang.comments),
            format_number(lang.blank),
            format_number(lang.total),
        ));
    }

    let totals = &report.loc.totals;
    out.push_str(&format!(
        "  {BOLD}{:<20} {:>8} {:>10} {:>10} {:>10} {:>10}{RESET}\n\n",
        "Total",
        format_number(totals.files),
        format_number(totals.code),
        format_number(totals.comments),
        format_number(totals.blank),
        format_number(totals.total),
    ));
}

fn render_files(report: &Report, out: &mut String) {
    if !report.files.largest_files.is_empty() {
        out.push_str(&format!("{BOLD}LARGEST FILES{RESET}\n"));
        for (i, file) in report.files.largest_files.iter().enumerate() {
            out.push_str(&format!(
                "  {DIM}{:>2}.{RESET} {YELLOW}{}{RESET} {CYAN}({} lines, {}){RESET}\n",
                i + 1,
                file.path,
                format_number(file.lines),
                format_bytes(file.size)
            ));
        }
        out.push('\n');
    }

    if !report.files.folder_stats.is_empty() {
        out.push_str(&format!("{BOLD}TOP FOLDERS BY FILE COUNT{RESET}\n"));
        for (i, folder) in report
            .files
            .folder_stats
            .iter()
            .take(MAX_FOLDERS)
            .enumerate()
        {
            out.push_str(&format!(
                "  {DIM}{:>2}.{RESET} {YELLOW}{}{RESET} {CYAN}({} files, {} lines){RESET}\n",
                i + 1,
                folder.display_path(),
                folder.file_count,
                format_number(folder.total_lines)
            ));
        }
        out.push('\n');
    }
}

fn render_todos(report: &Report, out: &mut String) {
    let todos = &report.todos;
    out.push_str(&format!("{BOLD}TODOS{RESET} ({} total)\n", todos.total));
    if todos.total == 0 {
        out.push_str(&format!("  {DIM}No TODO markers found{RESET}\n\n"));
        return;
    }

    let parts: Vec<String> = todos
        .by_type
        .iter()
        .map(|(kind, count)| {
            let color = if kind.is_critical() { RED } else { YELLOW };
            format!("{color}{count} {kind}{RESET}")
        })
        .collect();
    out.push_str(&format!("  {}\n", parts.join(" | ")));

    for item in todos.items.iter().take(MAX_TODO_ITEMS) {
        out.push_str(&format!(
            "  {DIM}{}:{}{RESET} {}: {}\n",
            item.file,
            item.line,
            item.kind,
            truncate(&item.text, 60)
        ));
    }

    if !todos.by_file.is_empty() {
        out.push_str(&format!("  {DIM}Most markers:{RESET}\n"));
        for entry in todos.by_file.iter().take(MAX_TODO_ITEMS) {
            out.push_str(&format!("    {YELLOW}{}{RESET} ({})\n", entry.file, entry.count));
        }
    }
    out.push('\n');
}

fn render_git(report: &Report, out: &mut String) {
    let git = &report.git;
    out.push_str(&format!("{BOLD}GIT{RESET}\n"));
    if !git.is_repository {
        out.push_str(&format!("  {DIM}Not a git repository{RESET}\n\n"));
        return;
    }

    out.push_str(&format!(
        "  Commits: {}  Contributors: {}  Branches: {}\n",
        format_number(git.total_commits),
        git.contributors.len(),
        git.branches
    ));
    if let (Some(first), Some(last)) = (&git.first_commit, &git.last_commit) {
        out.push_str(&format!("  History: {first} .. {last}\n"));
    }
    out.push_str(&format!(
        "  Last {} days: {} commits\n",
        ACTIVITY_WINDOW_DAYS,
        git.recent_commits()
    ));

    for contributor in git.contributors.iter().take(5) {
        out.push_str(&format!(
            "    {YELLOW}{}{RESET} {DIM}<{}>{RESET} ({})\n",
            contributor.name, contributor.email, contributor.commits
        ));
    }
    if !git.file_churn.is_empty() {
        out.push_str(&format!("  {DIM}Most changed:{RESET}\n"));
        for churn in git.file_churn.iter().take(5) {
            out.push_str(&format!(
                "    {YELLOW}{}{RESET} ({} changes)\n",
                churn.file, churn.changes
            ));
        }
    }
    out.push('\n');
}

fn render_deps(report: &Report, out: &mut String) {
    let deps = &report.deps;
    if deps.total_deps == 0 {
        return;
    }

    let s = &deps.summary;
    out.push_str(&format!("{BOLD}DEPENDENCIES{RESET} ({})\n", deps.package_manager));
    out.push_str(&format!(
        "  Total: {}  Prod: {}  Dev: {}  Peer: {}  Optional: {}  Build: {}\n",
        deps.total_deps, s.prod, s.dev, s.peer, s.optional, s.build
    ));
    let lockfile = if deps.has_lockfile {
        format!("{GREEN}yes{RESET}")
    } else {
        format!("{RED}no{RESET}")
    };
    out.push_str(&format!(
        "  Lockfile: {}  Outdated: {}\n\n",
        lockfile, deps.outdated_count
    ));
}

fn render_health(report: &Report, out: &mut String) {
    let health = &report.health;
    let grade_c = grade_color(health.grade);
    out.push_str(&format!(
        "{BOLD}HEALTH{RESET}  Score: {BOLD}{}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n",
        health.score, health.grade
    ));

    let b = &health.breakdown;
    out.push_str(&format!(
        "  Code quality: {}  Maintenance: {}  Documentation: {}  Activity: {}\n",
        format_score(b.code_quality),
        format_score(b.maintenance),
        format_score(b.documentation),
        format_score(b.activity)
    ));

    if !health.issues.is_empty() {
        out.push_str(&format!("\n  {BOLD}Issues{RESET}\n"));
        for issue in &health.issues {
            out.push_str(&format!("  {RED}•{RESET} {issue}\n"));
        }
    }
    if !health.recommendations.is_empty() {
        out.push_str(&format!("\n  {BOLD}Recommendations{RESET}\n"));
        for rec in &health.recommendations {
            out.push_str(&format!("  {GREEN}→{RESET} {rec}\n"));
        }
    }
    out.push('\n');
}

/// Category score out of 25, colored by band
fn format_score(score: u32) -> String {
    let color = if score >= 20 {
        GREEN
    } else if score >= 15 {
        YELLOW
    } else {
        RED
    };
    format!("{color}{score}/25{RESET}")
}

/// Integer with thousands separators
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Truncate on char boundaries, adding "..." when shortened
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}
