//! Decides where a file belongs from its name alone.

use crate::file_category::{EnabledCategories, RuleSet, UNKNOWN_CATEGORY};
use glob::Pattern;

/// Outcome of classifying one file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Transient or system artifact; never moved, never reported as an error.
    Ignore,
    /// Move the file into the named category folder.
    MoveTo(String),
    /// Leave the file where it is.
    NoMatch,
}

/// Extracts the lower-cased extension of a file name, including the dot.
///
/// Follows the usual path-suffix rule: leading dots do not start an
/// extension, so `.bashrc` and `README` both yield an empty string.
///
/// ```
/// use foldersort::classifier::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("README"), "");
/// assert_eq!(extension_of(".bashrc"), "");
/// ```
pub fn extension_of(filename: &str) -> String {
    let stem_start = filename.len() - filename.trim_start_matches('.').len();
    match filename[stem_start..].rfind('.') {
        Some(index) => filename[stem_start + index..].to_lowercase(),
        None => String::new(),
    }
}

/// Classifies file names against a rule set.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: RuleSet,
    exclude_patterns: Vec<Pattern>,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            exclude_patterns: Vec::new(),
        }
    }

    /// Adds glob patterns; a file name matching any of them is ignored.
    pub fn with_exclude_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decides what to do with `filename`.
    ///
    /// A file whose extension belongs to a disabled category stays in place;
    /// it never falls through to the catch-all. Only files that no rule
    /// claims at all go to `Unknown`, and only when `Unknown` is enabled.
    pub fn classify(&self, filename: &str, enabled: &EnabledCategories) -> Decision {
        if self.rules.is_ignored(filename)
            || self
                .exclude_patterns
                .iter()
                .any(|pattern| pattern.matches(filename))
        {
            return Decision::Ignore;
        }

        let extension = extension_of(filename);
        match self.rules.category_for_extension(&extension) {
            Some(category) if enabled.contains(category) => Decision::MoveTo(category.to_string()),
            Some(_) => Decision::NoMatch,
            None if enabled.contains(UNKNOWN_CATEGORY) => {
                Decision::MoveTo(UNKNOWN_CATEGORY.to_string())
            }
            None => Decision::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(names: &[&str]) -> EnabledCategories {
        names.iter().copied().collect()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("my.file.name.txt"), ".txt");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("trailing."), ".");
        assert_eq!(extension_of("..hidden.zip"), ".zip");
    }

    #[test]
    fn test_ignored_suffix_beats_everything() {
        let classifier = Classifier::default();
        let all = EnabledCategories::all(classifier.rules());
        assert_eq!(classifier.classify("cache.local", &all), Decision::Ignore);
        assert_eq!(
            classifier.classify("run.ipynb_checkpoints", &enabled(&[])),
            Decision::Ignore
        );
    }

    #[test]
    fn test_enabled_category_moves() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("report.PDF", &enabled(&["Documents"])),
            Decision::MoveTo("Documents".to_string())
        );
    }

    #[test]
    fn test_disabled_category_does_not_fall_to_unknown() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("song.mp3", &enabled(&["Documents", "Unknown"])),
            Decision::NoMatch
        );
    }

    #[test]
    fn test_unmatched_goes_to_unknown_only_when_enabled() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("data.unknownext", &enabled(&["Unknown"])),
            Decision::MoveTo("Unknown".to_string())
        );
        assert_eq!(
            classifier.classify("data.unknownext", &enabled(&["Documents"])),
            Decision::NoMatch
        );
        assert_eq!(
            classifier.classify("Makefile", &enabled(&["Unknown"])),
            Decision::MoveTo("Unknown".to_string())
        );
    }

    #[test]
    fn test_exclude_patterns_ignore() {
        let classifier = Classifier::default()
            .with_exclude_patterns(vec![Pattern::new("~$*").unwrap(), Pattern::new("*.part").unwrap()]);
        let all = EnabledCategories::all(classifier.rules());
        assert_eq!(classifier.classify("~$budget.xlsx", &all), Decision::Ignore);
        assert_eq!(classifier.classify("movie.mp4.part", &all), Decision::Ignore);
        assert_eq!(
            classifier.classify("budget.xlsx", &all),
            Decision::MoveTo("Documents".to_string())
        );
    }
}
