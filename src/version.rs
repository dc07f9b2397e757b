//! Bump levels and dotted numeric versions.
//!
//! Versions here are plain sequences of non-negative integers
//! (`major.minor.patch[.extra...]`). Pre-release and build metadata are not
//! supported.
use log::*;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt::Display, str::FromStr, sync::LazyLock};

use crate::{ChangelingError, Result};

static VERSION_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*$").unwrap());

/// How disruptive a change is. `Major` is the greatest element, `Patch` the
/// least, independent of declaration or serialization order.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    Major,
    Minor,
    #[default]
    Patch,
}

impl BumpLevel {
    /// Significance rank: 0 is the most significant level. Doubles as the
    /// index of the version segment this level increments.
    pub const fn rank(self) -> usize {
        match self {
            BumpLevel::Major => 0,
            BumpLevel::Minor => 1,
            BumpLevel::Patch => 2,
        }
    }

    /// Most disruptive level in `levels`, or [`BumpLevel::Patch`] when empty.
    pub fn highest<I>(levels: I) -> BumpLevel
    where
        I: IntoIterator<Item = BumpLevel>,
    {
        levels.into_iter().max().unwrap_or_default()
    }
}

impl Ord for BumpLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        // lower rank means more significant
        other.rank().cmp(&self.rank())
    }
}

impl PartialOrd for BumpLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BumpLevel::Major => f.write_str("major"),
            BumpLevel::Minor => f.write_str("minor"),
            BumpLevel::Patch => f.write_str("patch"),
        }
    }
}

/// Dotted sequence of non-negative integers with at least one segment.
///
/// Comparison pads the shorter version with zeros, so `1.2` and `1.2.0`
/// compare equal.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Produce the next version at `level`.
    ///
    /// The bumped segment is zero-extended into existence if needed, every
    /// later segment is reset to zero, and earlier segments are untouched.
    /// The result has `max(len, rank + 1)` segments. Fails when the bumped
    /// segment is already `u64::MAX`.
    pub fn bump(&self, level: BumpLevel) -> Result<Version> {
        let index = level.rank();
        let mut segments = self.segments.clone();

        if segments.len() < index + 1 {
            segments.resize(index + 1, 0);
        }

        let current = segments[index];
        segments[index] = current.checked_add(1).ok_or_else(|| {
            ChangelingError::invalid_version(
                self.to_string(),
                current.to_string(),
            )
        })?;

        for segment in segments.iter_mut().skip(index + 1) {
            *segment = 0;
        }

        Ok(Version { segments })
    }
}

impl FromStr for Version {
    type Err = ChangelingError;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .split('.')
            .map(|segment| {
                if segment.is_empty()
                    || !segment.chars().all(|c| c.is_ascii_digit())
                {
                    return Err(ChangelingError::invalid_version(s, segment));
                }
                segment
                    .parse::<u64>()
                    .map_err(|_| ChangelingError::invalid_version(s, segment))
            })
            .collect::<Result<Vec<u64>>>()?;

        Ok(Version { segments })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<String>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        let padded = |v: &Version, i: usize| -> u64 {
            v.segments.get(i).copied().unwrap_or(0)
        };

        (0..len)
            .map(|i| padded(self, i).cmp(&padded(other, i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Bump a dotted version string at `level`.
pub fn bump_version(version: &str, level: BumpLevel) -> Result<String> {
    let parsed: Version = version.parse()?;
    Ok(parsed.bump(level)?.to_string())
}

/// A release tag and the version it encodes once the prefix is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    /// Full tag name, prefix included.
    pub name: String,
    pub version: Version,
}

/// Find the greatest version among `tags` that carry `prefix` followed by a
/// dotted numeric version. Tags of any other shape are ignored.
pub fn highest_version_tag<S: AsRef<str>>(
    tags: &[S],
    prefix: &str,
) -> Result<VersionTag> {
    let mut highest: Option<VersionTag> = None;

    for tag in tags.iter().map(|t| t.as_ref().trim_end()) {
        let Some(stripped) = tag.strip_prefix(prefix) else {
            continue;
        };

        if !VERSION_TAG_REGEX.is_match(stripped) {
            debug!("ignoring non-version tag: {tag}");
            continue;
        }

        let Ok(version) = stripped.parse::<Version>() else {
            // numeric but out of range for u64
            warn!("ignoring tag with unparsable version: {tag}");
            continue;
        };

        if highest.as_ref().is_none_or(|h| version > h.version) {
            highest = Some(VersionTag {
                name: tag.to_string(),
                version,
            });
        }
    }

    highest.ok_or_else(|| ChangelingError::NoPriorRelease {
        tag_prefix: prefix.to_string(),
    })
}
