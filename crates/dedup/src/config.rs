use serde::{Deserialize, Serialize};

use crate::error::DedupError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine settings. Every field has a default, so an empty TOML document is a
/// valid config that reproduces the reference behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupConfig {
    pub identity_mode: IdentityMode,
    pub merge_strategy: MergeStrategy,
    /// Whether rows whose cleaned ID is empty are ID-duplicates of each other.
    pub group_blank_ids: bool,
    pub fuzzy: FuzzyConfig,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            identity_mode: IdentityMode::default(),
            merge_strategy: MergeStrategy::default(),
            group_blank_ids: true,
            fuzzy: FuzzyConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity matching
// ---------------------------------------------------------------------------

/// How the identity matcher decides that two rows name the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// Identical identity keys only.
    Exact,
    /// Sorted, windowed similarity clustering over identity keys.
    Fuzzy,
}

impl Default for IdentityMode {
    fn default() -> Self {
        Self::Exact
    }
}

impl std::fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzyConfig {
    /// Two keys match when their similarity ratio is strictly above this.
    pub threshold: f64,
    /// Number of following sorted rows each anchor is compared against.
    pub window: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            window: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Disjoint-set union over positions. Full transitive closure.
    UnionFind,
    /// Each candidate joins the first overlapping group only. Kept for
    /// compatibility with older reports; bridging candidates can leave a
    /// position in two groups.
    FirstMatch,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        Self::UnionFind
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnionFind => write!(f, "union_find"),
            Self::FirstMatch => write!(f, "first_match"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DedupConfig {
    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let config: DedupConfig =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        let threshold = self.fuzzy.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(DedupError::ConfigValidation(format!(
                "fuzzy.threshold must be in (0, 1], got {threshold}"
            )));
        }

        if self.fuzzy.window == 0 {
            return Err(DedupError::ConfigValidation(
                "fuzzy.window must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
