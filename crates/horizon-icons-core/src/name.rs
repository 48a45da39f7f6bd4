//! Icon identifiers.
//!
//! An icon is addressed by a `(provider, prefix, name)` triple. The canonical
//! string form is `@provider:prefix:name`, shortened to `prefix:name` for the
//! default (empty) provider and to a bare `name` in simple-names mode.
//!
//! Parsing is deliberately permissive; strict validity (`[a-z0-9-]` parts) is
//! a separate check, see [`IconName::is_valid`].

use std::fmt;

/// A structured icon identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IconName {
    /// Provider namespace. Empty for the default provider.
    pub provider: String,
    /// Icon set prefix. Empty only in simple-names mode.
    pub prefix: String,
    /// Icon name within the set.
    pub name: String,
}

impl IconName {
    /// Create an identifier from its parts.
    pub fn new(
        provider: impl Into<String>,
        prefix: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Parse an icon name.
    ///
    /// Accepted forms:
    ///
    /// - `@provider:prefix:name`
    /// - `provider:prefix:name`
    /// - `prefix:name`
    /// - `prefix-name` (split at the first dash)
    /// - `name` (only when `allow_simple_name` is set)
    ///
    /// Returns `None` for anything else, or when the prefix or name is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_icons_core::IconName;
    ///
    /// let icon = IconName::parse("@acme:mdi:home", false).unwrap();
    /// assert_eq!(icon.provider, "acme");
    /// assert_eq!(icon.prefix, "mdi");
    /// assert_eq!(icon.name, "home");
    ///
    /// let icon = IconName::parse("mdi-light-home", false).unwrap();
    /// assert_eq!(icon.prefix, "mdi");
    /// assert_eq!(icon.name, "light-home");
    /// ```
    pub fn parse(value: &str, allow_simple_name: bool) -> Option<Self> {
        let mut parts: Vec<&str> = value.split(':').collect();
        let mut provider = "";

        if value.starts_with('@') {
            if parts.len() < 2 || parts.len() > 3 {
                return None;
            }
            provider = &parts.remove(0)[1..];
        }

        if parts.len() > 3 || parts.is_empty() {
            return None;
        }

        let icon = if parts.len() > 1 {
            let name = parts.pop().unwrap_or_default();
            let prefix = parts.pop().unwrap_or_default();
            let provider = parts.first().copied().unwrap_or(provider);
            Self::new(provider, prefix, name)
        } else {
            let name = parts[0];
            match name.split_once('-') {
                Some((prefix, rest)) => Self::new(provider, prefix, rest),
                None if allow_simple_name && provider.is_empty() => Self::new("", "", name),
                None => return None,
            }
        };

        icon.has_required_parts(allow_simple_name).then_some(icon)
    }

    /// Check that name and prefix are present. The prefix may only be empty
    /// in simple-names mode.
    fn has_required_parts(&self, allow_simple_name: bool) -> bool {
        let prefix_ok = !self.prefix.is_empty() || (allow_simple_name && self.provider.is_empty());
        prefix_ok && !self.name.is_empty()
    }

    /// Strict validity check: prefix and name (and provider, when set) must
    /// match `[a-z0-9]+(-[a-z0-9]+)*`.
    pub fn is_valid(&self) -> bool {
        (self.provider.is_empty() || is_valid_part(&self.provider))
            && is_valid_part(&self.prefix)
            && is_valid_part(&self.name)
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.provider.is_empty() {
            write!(f, "@{}:", self.provider)?;
        }
        if !self.prefix.is_empty() {
            write!(f, "{}:", self.prefix)?;
        }
        f.write_str(&self.name)
    }
}

/// Check a single identifier part against `[a-z0-9]+(-[a-z0-9]+)*`.
///
/// ```
/// use horizon_icons_core::is_valid_part;
///
/// assert!(is_valid_part("arrow-left-2"));
/// assert!(!is_valid_part("arrow--left"));
/// assert!(!is_valid_part("Arrow"));
/// ```
pub fn is_valid_part(value: &str) -> bool {
    !value.is_empty()
        && value.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// An icon reference as accepted by the name-list APIs: either an already
/// structured identifier or a string still to be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconRef {
    /// A structured identifier.
    Name(IconName),
    /// A string in one of the forms accepted by [`IconName::parse`].
    Text(String),
}

impl IconRef {
    /// Resolve to a structured identifier, dropping unusable entries.
    pub fn resolve(&self, allow_simple_name: bool) -> Option<IconName> {
        match self {
            Self::Name(icon) => icon
                .has_required_parts(allow_simple_name)
                .then(|| icon.clone()),
            Self::Text(text) => IconName::parse(text, allow_simple_name),
        }
    }
}

impl From<IconName> for IconRef {
    fn from(icon: IconName) -> Self {
        Self::Name(icon)
    }
}

impl From<&IconName> for IconRef {
    fn from(icon: &IconName) -> Self {
        Self::Name(icon.clone())
    }
}

impl From<&str> for IconRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for IconRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for IconRef {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_and_name() {
        let icon = IconName::parse("mdi:home", false).unwrap();
        assert_eq!(icon, IconName::new("", "mdi", "home"));
        assert_eq!(icon.to_string(), "mdi:home");
    }

    #[test]
    fn test_parse_with_provider() {
        let icon = IconName::parse("@acme:test:foo", false).unwrap();
        assert_eq!(icon, IconName::new("acme", "test", "foo"));
        assert_eq!(icon.to_string(), "@acme:test:foo");

        // Provider without the leading @
        let icon = IconName::parse("acme:test:foo", false).unwrap();
        assert_eq!(icon, IconName::new("acme", "test", "foo"));

        // Provider with dashed name
        let icon = IconName::parse("@acme:test-bar", false).unwrap();
        assert_eq!(icon, IconName::new("acme", "test", "bar"));
    }

    #[test]
    fn test_parse_dash_form() {
        let icon = IconName::parse("fa-solid-arrow", false).unwrap();
        assert_eq!(icon, IconName::new("", "fa", "solid-arrow"));
    }

    #[test]
    fn test_parse_simple_name() {
        assert!(IconName::parse("home", false).is_none());

        let icon = IconName::parse("home", true).unwrap();
        assert_eq!(icon, IconName::new("", "", "home"));
        assert_eq!(icon.to_string(), "home");

        // Simple names are not available under a provider
        assert!(IconName::parse("@acme:home", true).is_none());
        assert!(IconName::parse("@acme", true).is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(IconName::parse("", false).is_none());
        assert!(IconName::parse("a:b:c:d", false).is_none());
        assert!(IconName::parse("@a:b:c:d", false).is_none());
        assert!(IconName::parse("mdi:", false).is_none());
        assert!(IconName::parse(":home", false).is_none());
        assert!(IconName::parse("-home", false).is_none());
    }

    #[test]
    fn test_parsing_is_looser_than_validity() {
        let icon = IconName::parse("MDI:Home_Icon", false).unwrap();
        assert!(!icon.is_valid());

        let icon = IconName::parse("mdi:home-variant", false).unwrap();
        assert!(icon.is_valid());
    }

    #[test]
    fn test_valid_part() {
        assert!(is_valid_part("a"));
        assert!(is_valid_part("a1-b2-c3"));
        assert!(!is_valid_part(""));
        assert!(!is_valid_part("-a"));
        assert!(!is_valid_part("a-"));
        assert!(!is_valid_part("a_b"));
        assert!(!is_valid_part("a.b"));
    }

    #[test]
    fn test_icon_ref_resolve() {
        let by_name: IconRef = IconName::new("", "mdi", "home").into();
        assert_eq!(by_name.resolve(false), Some(IconName::new("", "mdi", "home")));

        let empty_prefix: IconRef = IconName::new("", "", "home").into();
        assert_eq!(empty_prefix.resolve(false), None);
        assert!(empty_prefix.resolve(true).is_some());

        let text: IconRef = "bad".into();
        assert_eq!(text.resolve(false), None);
    }
}
