use crate::api::features::FeatureName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category assigned to a cell.
///
/// Each policy uses a subset: single-feature policies yield `Good`/`Poor`,
/// two-feature policies `Absent`/`Partial`/`Combined`, three-feature
/// policies `Absent`/`Minimal`/`Partial`/`Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Good,
    Poor,
    Absent,
    Partial,
    Combined,
    Minimal,
    Full,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Good,
        Category::Poor,
        Category::Absent,
        Category::Partial,
        Category::Combined,
        Category::Minimal,
        Category::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "good",
            Category::Poor => "poor",
            Category::Absent => "absent",
            Category::Partial => "partial",
            Category::Combined => "combined",
            Category::Minimal => "minimal",
            Category::Full => "full",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Rule set mapping per-feature proximity to a [`Category`].
///
/// Policies are evaluated as a short-circuit decision tree: when a gating
/// primary feature is not near, the result is [`Category::Absent`] and the
/// secondary features are never tested.
///
/// Deserializes from configuration as a tagged value, e.g.
/// `{ kind = "two_feature", primary = "stations", secondary = "rivers" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// `Good` when the feature is near, otherwise `Poor`.
    SingleFeature { feature: FeatureName },
    /// Primary gates; then `Combined` if the secondary is near, else `Partial`.
    TwoFeature {
        primary: FeatureName,
        secondary: FeatureName,
    },
    /// Primary gates; then `Full`, `Partial` or `Minimal` for two, one or
    /// zero secondaries near.
    ThreeFeature {
        primary: FeatureName,
        secondary: [FeatureName; 2],
    },
}

impl CategoryPolicy {
    pub fn single(feature: impl Into<FeatureName>) -> Self {
        CategoryPolicy::SingleFeature {
            feature: feature.into(),
        }
    }

    pub fn two(primary: impl Into<FeatureName>, secondary: impl Into<FeatureName>) -> Self {
        CategoryPolicy::TwoFeature {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn three(
        primary: impl Into<FeatureName>,
        first: impl Into<FeatureName>,
        second: impl Into<FeatureName>,
    ) -> Self {
        CategoryPolicy::ThreeFeature {
            primary: primary.into(),
            secondary: [first.into(), second.into()],
        }
    }

    /// Every feature the policy reads, primary first.
    pub fn features(&self) -> Vec<&FeatureName> {
        match self {
            CategoryPolicy::SingleFeature { feature } => vec![feature],
            CategoryPolicy::TwoFeature { primary, secondary } => vec![primary, secondary],
            CategoryPolicy::ThreeFeature { primary, secondary } => {
                vec![primary, &secondary[0], &secondary[1]]
            }
        }
    }

    /// Every category this policy can produce.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            CategoryPolicy::SingleFeature { .. } => &[Category::Good, Category::Poor],
            CategoryPolicy::TwoFeature { .. } => {
                &[Category::Absent, Category::Partial, Category::Combined]
            }
            CategoryPolicy::ThreeFeature { .. } => &[
                Category::Absent,
                Category::Minimal,
                Category::Partial,
                Category::Full,
            ],
        }
    }

    /// Evaluates the decision tree. `near` is called lazily, once per
    /// feature at most, and never for secondaries when the primary fails.
    pub fn evaluate<F>(&self, mut near: F) -> Category
    where
        F: FnMut(&FeatureName) -> bool,
    {
        match self {
            CategoryPolicy::SingleFeature { feature } => {
                if near(feature) {
                    Category::Good
                } else {
                    Category::Poor
                }
            }
            CategoryPolicy::TwoFeature { primary, secondary } => {
                if !near(primary) {
                    return Category::Absent;
                }
                if near(secondary) {
                    Category::Combined
                } else {
                    Category::Partial
                }
            }
            CategoryPolicy::ThreeFeature { primary, secondary } => {
                if !near(primary) {
                    return Category::Absent;
                }
                let count = secondary.iter().filter(|name| near(name)).count();
                match count {
                    2 => Category::Full,
                    1 => Category::Partial,
                    _ => Category::Minimal,
                }
            }
        }
    }
}
