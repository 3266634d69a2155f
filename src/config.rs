//! Document-scoped proposition settings, read once before any sentence.
//!
//! The file form is TOML. Every boolean flag must be present; limits fall
//! back to their defaults.
//!
//! ```toml
//! treat_nominal_premods_like_names = false
//! use_nominal_premods = true
//! make_partitive_props = false
//! unify_appositives = false
//! use_2009_props = true
//! max_sentence_props = 250
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_SENTENCE_PROPS: usize = 250;
pub const DEFAULT_MAX_OPP_LINKS: usize = 16;
pub const DEFAULT_MAX_MENTION_OPPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropositionConfig {
    /// Recognised-type nominal premodifiers become `<unknown>` references
    /// rather than modifier predicates.
    pub treat_nominal_premods_like_names: bool,
    /// Inside a name-bearing NP whose head noun has its own mention, attach
    /// premodifiers to that noun mention.
    pub use_nominal_premods: bool,
    /// Keep the "of" link between a partitive and its whole.
    pub make_partitive_props: bool,
    /// Collapse both sides of an appositive into the outer mention.
    pub unify_appositives: bool,
    /// Allow temporals nested in temporals and promote temporal links out of
    /// possessive links.
    pub use_2009_props: bool,
    pub max_sentence_props: usize,
    pub max_opp_links: usize,
    pub max_mention_opps: usize,
}

/// File form: flags are optional here so a missing one can be named.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    treat_nominal_premods_like_names: Option<bool>,
    use_nominal_premods: Option<bool>,
    make_partitive_props: Option<bool>,
    unify_appositives: Option<bool>,
    use_2009_props: Option<bool>,
    max_sentence_props: Option<usize>,
    max_opp_links: Option<usize>,
    max_mention_opps: Option<usize>,
}

fn required(value: Option<bool>, name: &'static str) -> Result<bool, ConfigError> {
    value.ok_or(ConfigError::MissingFlag { name })
}

impl RawConfig {
    fn validate(self) -> Result<PropositionConfig, ConfigError> {
        Ok(PropositionConfig {
            treat_nominal_premods_like_names: required(
                self.treat_nominal_premods_like_names,
                "treat_nominal_premods_like_names",
            )?,
            use_nominal_premods: required(self.use_nominal_premods, "use_nominal_premods")?,
            make_partitive_props: required(self.make_partitive_props, "make_partitive_props")?,
            unify_appositives: required(self.unify_appositives, "unify_appositives")?,
            use_2009_props: required(self.use_2009_props, "use_2009_props")?,
            max_sentence_props: self
                .max_sentence_props
                .unwrap_or(DEFAULT_MAX_SENTENCE_PROPS),
            max_opp_links: self.max_opp_links.unwrap_or(DEFAULT_MAX_OPP_LINKS),
            max_mention_opps: self.max_mention_opps.unwrap_or(DEFAULT_MAX_MENTION_OPPS),
        })
    }
}

impl PropositionConfig {
    /// Stock English settings.
    pub fn english_defaults() -> Self {
        Self {
            treat_nominal_premods_like_names: false,
            use_nominal_premods: true,
            make_partitive_props: false,
            unify_appositives: false,
            use_2009_props: true,
            max_sentence_props: DEFAULT_MAX_SENTENCE_PROPS,
            max_opp_links: DEFAULT_MAX_OPP_LINKS,
            max_mention_opps: DEFAULT_MAX_MENTION_OPPS,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        raw.validate()
    }

    pub fn with_max_sentence_props(mut self, max: usize) -> Self {
        self.max_sentence_props = max;
        self
    }
}

impl Default for PropositionConfig {
    fn default() -> Self {
        Self::english_defaults()
    }
}
