//! Video link detection and canonicalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

/// Recognized link shapes, tried in order: watch page, short link, shorts, playlist.
///
/// The scheme and `www.` prefix are optional so that bare `youtu.be/...` text
/// copied from a chat client is still picked up. Matching is ASCII only:
/// ids end at the first character outside `[A-Za-z0-9_-]`.
#[allow(clippy::expect_used)]
static LINK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i-u)(https?://)?(www\.)?(youtube\.com/watch\?v=[A-Za-z0-9_-]+)",
        r"(?i-u)(https?://)?(www\.)?(youtu\.be/[A-Za-z0-9_-]+)",
        r"(?i-u)(https?://)?(www\.)?(youtube\.com/shorts/[A-Za-z0-9_-]+)",
        r"(?i-u)(https?://)?(www\.)?(youtube\.com/playlist\?list=[A-Za-z0-9_-]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("link regex is valid")) // Static patterns, safe to panic
    .collect()
});

/// Scheme prepended to matches that were copied without one.
const DEFAULT_SCHEME: &str = "https://";

/// A canonical absolute URL identifying one downloadable media item.
///
/// Links are only produced by [`match_link`], so every value has an explicit
/// scheme and a lowercase scheme/host. Equality is on the canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(String);

impl Link {
    /// Returns the canonical URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the link, returning the canonical URL string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Finds the first recognized video link in arbitrary text.
///
/// Patterns are tried in a fixed order (watch, short link, shorts, playlist)
/// and the first pattern that matches anywhere in the text wins. Matching is
/// case-insensitive. A match without a scheme gets `https://`. Empty input
/// is simply no match.
///
/// # Examples
///
/// ```
/// use tubewatch_core::parser::match_link;
///
/// let link = match_link("check this out https://youtu.be/abc123XYZ9 nice").unwrap();
/// assert_eq!(link.as_str(), "https://youtu.be/abc123XYZ9");
///
/// assert!(match_link("nothing to see here").is_none());
/// ```
#[tracing::instrument(level = "trace", skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn match_link(text: &str) -> Option<Link> {
    if text.trim().is_empty() {
        return None;
    }

    for pattern in LINK_PATTERNS.iter() {
        let Some(found) = pattern.find(text) else {
            continue;
        };
        trace!(candidate = found.as_str(), "found link candidate");
        match canonicalize(found.as_str()) {
            Some(link) => return Some(link),
            None => {
                debug!(candidate = found.as_str(), "link candidate failed to parse");
            }
        }
    }

    None
}

/// Adds the default scheme when missing and lowercases scheme and host.
///
/// Path and query are kept verbatim: video ids are case-sensitive.
fn canonicalize(raw: &str) -> Option<Link> {
    let prefix = raw
        .chars()
        .take(DEFAULT_SCHEME.len())
        .collect::<String>()
        .to_ascii_lowercase();
    let has_scheme = prefix.starts_with("http://") || prefix.starts_with(DEFAULT_SCHEME);

    let absolute = if has_scheme {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    };

    let parsed = Url::parse(&absolute).ok()?;
    parsed.host_str()?;
    Some(Link(parsed.to_string()))
}
