//! Path exemption checks.
//!
//! A request path is exempt when it equals one of the configured exemptions
//! after both sides are normalized to end with `/`. Nothing else matches: no
//! prefixes, no wildcards.

const SEPARATOR: char = '/';

/// Append a trailing `/` when missing.
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

/// Decide whether `path` needs authentication.
///
/// A missing path needs none. An empty exemption list exempts nothing, so every
/// present path needs authentication.
#[must_use]
pub fn requires_auth<S: AsRef<str>>(path: Option<&str>, exemptions: &[S]) -> bool {
    let Some(path) = path else {
        return false;
    };
    if exemptions.is_empty() {
        return true;
    }
    let path = normalize(path);
    !exemptions
        .iter()
        .any(|exempt| normalize(exempt.as_ref()) == path)
}

/// Ordered, pre-normalized exemption list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExemptPaths {
    paths: Vec<String>,
}

impl ExemptPaths {
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for path in paths {
            let trimmed = path.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let path = normalize(trimmed);
            if !normalized.contains(&path) {
                normalized.push(path);
            }
        }
        Self { paths: normalized }
    }

    #[must_use]
    pub fn requires_auth(&self, path: Option<&str>) -> bool {
        requires_auth(path, &self.paths)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn missing_path_never_requires_auth() {
        assert!(!requires_auth(None, &["/api/v1/status/"]));
        assert!(!requires_auth(None, &NONE));
    }

    #[test]
    fn empty_exemptions_require_auth() {
        assert!(requires_auth(Some("/api/v1/status"), &NONE));
        assert!(requires_auth(Some("/"), &NONE));
    }

    #[test]
    fn trailing_slash_is_ignored_on_both_sides() {
        assert!(!requires_auth(Some("/api/v1/status/"), &["/api/v1/status"]));
        assert!(!requires_auth(Some("/api/v1/status"), &["/api/v1/status/"]));
        assert!(!requires_auth(Some("/api/v1/status"), &["/api/v1/status"]));
    }

    #[test]
    fn no_prefix_or_wildcard_matching() {
        let exemptions = ["/api/v1/status/"];
        assert!(requires_auth(Some("/api/v1/status/extra"), &exemptions));
        assert!(requires_auth(Some("/api/v1/stat"), &exemptions));
        assert!(!requires_auth(Some("/api/v1/stat*"), &["/api/v1/stat*"]));
        assert!(requires_auth(Some("/api/v1/status"), &["/api/v1/stat*"]));
    }

    #[test]
    fn only_a_single_trailing_slash_is_normalized() {
        assert!(requires_auth(Some("/api/v1/status//"), &["/api/v1/status"]));
    }

    #[test]
    fn exempt_paths_normalize_and_dedup() {
        let paths = ExemptPaths::new(["/a", "/a/", " ", "/b/"]);
        assert_eq!(paths.as_slice(), &["/a/".to_string(), "/b/".to_string()]);
        assert!(!paths.requires_auth(Some("/a")));
        assert!(paths.requires_auth(Some("/c")));
    }

    #[test]
    fn empty_exempt_paths_require_auth() {
        let paths = ExemptPaths::default();
        assert!(paths.is_empty());
        assert!(paths.requires_auth(Some("/anything")));
        assert!(!paths.requires_auth(None));
    }
}
