//! Per-language line counts

use super::classifier::classify;
use crate::discovery::FileProvider;
use crate::models::{FileRecord, LanguageStats, LocResult, LocTotals, ParseResult};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Classify every readable file and roll the results up per language.
///
/// Languages are sorted by code lines, descending; ties keep the order in
/// which the language was first seen in `files`.
pub fn analyze_loc(files: &[FileRecord], provider: &dyn FileProvider) -> LocResult {
    let parsed: Vec<Option<ParseResult>> = files
        .par_iter()
        .map(|file| {
            provider
                .content(&file.path)
                .map(|content| classify(&content, &file.language))
        })
        .collect();

    let mut by_language: Vec<LanguageStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (file, result) in files.iter().zip(parsed) {
        let Some(result) = result else {
            continue;
        };
        match index.get(file.language.as_str()) {
            Some(&i) => by_language[i].add(result),
            None => {
                index.insert(file.language.as_str(), by_language.len());
                by_language.push(LanguageStats::new(&file.language, result));
            }
        }
    }

    by_language.sort_by(|a, b| b.code.cmp(&a.code));
    let totals = LocTotals::from_languages(&by_language);

    debug!(
        "LOC: {} languages, {} files, {} code lines",
        by_language.len(),
        totals.files,
        totals.code
    );

    LocResult {
        by_language,
        totals,
    }
}
