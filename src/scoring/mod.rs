//! Health Scoring
//!
//! A 0-100 score built from four equally weighted categories.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = CodeQuality + Maintenance + Documentation + Activity
//!
//! Where each category:
//!   Category = max(0, 25 - deductions)
//! ```
//!
//! # Deductions
//!
//! - **Code quality**: -2 per file over 500 lines (max -10), -5 when
//!   comments/code < 0.05, -3 when it is above 0.5
//! - **Maintenance**: -15/-8/-4 for more than 50/20/10 markers, -5 for more
//!   than 5 FIXME/BUG/XXX items, -5 without a lockfile, -5 for more than 10
//!   outdated dependencies
//! - **Documentation**: -10 without Markdown files, -5 when comments/code < 0.1
//! - **Activity**: -15 outside a git repository; otherwise -10 with no
//!   commits in 30 days (-5 under 5), -3 for a single contributor with more
//!   than 50 commits
//!
//! # Grades
//!
//! A >= 90, B >= 75, C >= 60, D >= 40, otherwise F.

mod health;

pub use health::{calculate_health_score, HealthScorer, CATEGORY_MAX};
