//! Version resolution for a release commit.

use std::cmp::Ordering;

use semver::Version;

use crate::error::Result;
use crate::git::Repository;

/// Resolves the version string for a commit.
///
/// When tags contain the commit, the most significant one wins (see
/// [tag_precedence]); with no containing tag the commit itself becomes the
/// version, so every build gets a usable, unique label.
///
/// # Arguments
/// * `repo` - Repository to query for tags
/// * `commit` - The commit being released
///
/// # Returns
/// * `Ok(String)` - A tag name, or the commit when nothing tags it
pub fn resolve_version<R: Repository>(repo: &R, commit: &str) -> Result<String> {
    let tags = repo.tags_containing(commit)?;
    Ok(tags
        .into_iter()
        .max_by(|a, b| tag_precedence(a, b))
        .unwrap_or_else(|| commit.to_string()))
}

/// Orders two tag names by release significance.
///
/// Tags that parse as semantic versions outrank ones that do not and are
/// compared by version; the rest fall back to lexicographic order. Ties on
/// equal versions ("1.2.0" vs "v1.2.0") break lexicographically so the
/// result is deterministic.
pub fn tag_precedence(a: &str, b: &str) -> Ordering {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Parses a tag as a semantic version, tolerating a `v`/`V` prefix and
/// missing minor or patch components ("v2.0" parses as 2.0.0).
fn parse_lenient(tag: &str) -> Option<Version> {
    let tag = tag.trim_start_matches(['v', 'V']);
    if let Ok(version) = Version::parse(tag) {
        return Some(version);
    }

    // Pad a short core ("2" or "2.0") before any pre-release or build part.
    let boundary = tag.find(['-', '+']).unwrap_or(tag.len());
    let (core, rest) = tag.split_at(boundary);
    let padded = match core.matches('.').count() {
        0 => format!("{core}.0.0{rest}"),
        1 => format!("{core}.0{rest}"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}
