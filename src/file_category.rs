//! Category rules for sorting files by extension.
//!
//! A [`RuleSet`] is an ordered list of [`CategoryRule`]s plus the suffixes of
//! transient files that must never be moved. Order matters: when two rules
//! claim the same extension, the one declared first wins.
//!
//! # Examples
//!
//! ```
//! use foldersort::file_category::RuleSet;
//!
//! let rules = RuleSet::standard();
//! assert_eq!(rules.category_for_extension(".pdf"), Some("Documents"));
//! assert_eq!(rules.category_for_extension(".mp4"), Some("Video"));
//! assert_eq!(rules.category_for_extension(".xyz"), None);
//! ```

use std::collections::BTreeSet;

/// Name of the catch-all category for files no other rule claims.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

const STANDARD_RULES: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[
            ".pdf", ".docx", ".txt", ".xlsx", ".pptx", ".dotx", ".doc", ".xls", ".csv",
        ],
    ),
    ("Images", &[".jpg", ".jpeg", ".png", ".gif"]),
    ("Music", &[".mp3", ".wav"]),
    ("Video", &[".mp4"]),
    ("Archives", &[".zip", ".rar", ".7z"]),
    ("Programs", &[".exe", ".msi"]),
    (UNKNOWN_CATEGORY, &[]),
];

/// Editor scratch folders, checkpoints and embedded database artifacts.
const STANDARD_IGNORED_SUFFIXES: &[&str] = &[
    ".local",
    ".tmh",
    ".templates",
    ".settings",
    ".project",
    ".objects",
    ".ipynb_checkpoints",
    ".entities",
    ".mysql-9.1.0-winx64",
];

/// A named category and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Folder name files of this category are moved into.
    pub name: String,
    /// Lower-case extensions including the leading dot. Empty for the
    /// catch-all category, which is never matched by extension.
    pub extensions: BTreeSet<String>,
}

impl CategoryRule {
    /// Creates a rule, normalizing every extension to `.lowercase`.
    pub fn new<I, S>(name: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| ext.len() > 1)
                .collect(),
        }
    }

    /// Returns true if this rule claims the given (normalized) extension.
    pub fn matches(&self, extension: &str) -> bool {
        !extension.is_empty() && self.extensions.contains(extension)
    }

    /// Returns true for the extensionless catch-all rule.
    pub fn is_catch_all(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Lower-cases an extension and makes sure it starts with a dot.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Ordered category rules plus the ignored-suffix set.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
    ignored_suffixes: Vec<String>,
}

impl RuleSet {
    /// The built-in rules: Documents, Images, Music, Video, Archives,
    /// Programs and the Unknown catch-all.
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES
                .iter()
                .map(|(name, exts)| CategoryRule::new(name, exts.iter()))
                .collect(),
            ignored_suffixes: STANDARD_IGNORED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Builds a rule set from explicit parts.
    pub fn new(rules: Vec<CategoryRule>, ignored_suffixes: Vec<String>) -> Self {
        Self {
            rules,
            ignored_suffixes,
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Suffixes marking transient files.
    pub fn ignored_suffixes(&self) -> &[String] {
        &self.ignored_suffixes
    }

    /// Inserts a rule just before the catch-all, or at the end when there is none.
    pub fn insert_before_catch_all(&mut self, rule: CategoryRule) {
        let position = self
            .rules
            .iter()
            .position(CategoryRule::is_catch_all)
            .unwrap_or(self.rules.len());
        self.rules.insert(position, rule);
    }

    /// Appends an ignored suffix if not already present.
    pub fn add_ignored_suffix(&mut self, suffix: &str) {
        if !suffix.is_empty() && !self.ignored_suffixes.iter().any(|s| s == suffix) {
            self.ignored_suffixes.push(suffix.to_string());
        }
    }

    /// Returns true if the file name ends with any ignored suffix.
    pub fn is_ignored(&self, filename: &str) -> bool {
        self.ignored_suffixes
            .iter()
            .any(|suffix| filename.ends_with(suffix.as_str()))
    }

    /// The first declared category claiming this extension.
    pub fn category_for_extension(&self, extension: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(extension))
            .map(|rule| rule.name.as_str())
    }

    /// Looks up a declared category by name, ignoring case, and returns its
    /// canonical spelling.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.name.eq_ignore_ascii_case(name.trim()))
            .map(|rule| rule.name.as_str())
    }

    /// All category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// The set of category names the user opted into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledCategories(BTreeSet<String>);

impl EnabledCategories {
    /// Every category of the rule set, catch-all included.
    pub fn all(rules: &RuleSet) -> Self {
        Self(rules.names().map(str::to_string).collect())
    }

    /// Resolves user-supplied names against the rule set.
    ///
    /// Returns the first name that matches no declared category as `Err`.
    pub fn resolve<I, S>(rules: &RuleSet, names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            let canonical = rules
                .resolve_name(name)
                .ok_or_else(|| name.trim().to_string())?;
            set.insert(canonical.to_string());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for EnabledCategories {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
