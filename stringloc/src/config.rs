//! Settings shared by every per-locale run.

use serde::Deserialize;

use crate::merge::MergeOptions;

pub const DEFAULT_SOURCE_LANG: &str = "en";
pub const DEFAULT_WORKERS: usize = 5;

/// Passed by reference into each run; runs never share mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Language of the source file.
    pub source_lang: String,
    /// Re-translate every leaf, ignoring existing locale files.
    pub force: bool,
    /// Log each leaf as it is resolved or checked.
    pub verbose: bool,
    /// Size of the worker pool running locales in parallel.
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            force: false,
            verbose: false,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl RunConfig {
    /// Merge options for translating into `target_lang`.
    pub fn merge_options(&self, target_lang: &str) -> MergeOptions {
        MergeOptions::new(self.source_lang.clone(), target_lang)
            .with_force(self.force)
            .with_verbose(self.verbose)
    }
}
