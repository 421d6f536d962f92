//! Category domain entity and slug derivation.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid slug regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Home & Garden")]
    pub name: String,
    #[schema(example = "home-garden")]
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to persist a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

/// Derive a URL slug from a display name.
///
/// Lowercases, drops everything except ASCII letters, digits, `_`,
/// whitespace and `-`, then joins whitespace runs with `-`. Runs of `-`
/// collapse to one and never lead or trail.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let dashed = WHITESPACE_RUNS.replace_all(&stripped, "-");
    DASH_RUNS
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("Sports"), "sports");
    }

    #[test]
    fn test_slugify_strips_punctuation_and_accents() {
        assert_eq!(slugify("Electrónica!"), "electrnica");
        assert_eq!(slugify("Kids' Toys (new)"), "kids-toys-new");
    }

    #[test]
    fn test_slugify_keeps_dashes_and_underscores() {
        assert_eq!(slugify("  pre-owned  snake_case "), "pre-owned-snake_case");
    }

    #[test]
    fn test_slugify_collapses_dash_runs() {
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("Tools -- Hardware"), "tools-hardware");
        assert_eq!(slugify("- Sale! -"), "sale");
        assert_eq!(slugify("---"), "");
    }
}
