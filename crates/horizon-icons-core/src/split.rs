//! Grouping icon names by provider and prefix.
//!
//! Loading works per registry, so a flat list of names is first split into a
//! `provider → prefix → names` structure.

use std::collections::{BTreeMap, HashSet};

use crate::name::{IconName, IconRef};

/// Icon names grouped by provider, then by prefix.
pub type SplitIconNames = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Split a list of icon references into a provider → prefix → names map.
///
/// Strings are parsed with [`IconName::parse`]; unparseable entries are
/// dropped silently. Names are de-duplicated. When `into` is given, results
/// are added to it.
///
/// # Example
///
/// ```
/// use horizon_icons_core::split_icon_names;
///
/// let split = split_icon_names(["mdi:home", "mdi:account", "mdi:home"], false, None);
/// assert_eq!(split[""]["mdi"], vec!["home", "account"]);
/// ```
pub fn split_icon_names<I, R>(
    names: I,
    allow_simple_names: bool,
    into: Option<SplitIconNames>,
) -> SplitIconNames
where
    I: IntoIterator<Item = R>,
    R: Into<IconRef>,
{
    let mut result = into.unwrap_or_default();
    let mut seen: HashSet<IconName> = flatten_split_icon_names(&result).into_iter().collect();
    for item in names {
        let Some(icon) = item.into().resolve(allow_simple_names) else {
            continue;
        };
        if !seen.insert(icon.clone()) {
            continue;
        }
        result
            .entry(icon.provider)
            .or_default()
            .entry(icon.prefix)
            .or_default()
            .push(icon.name);
    }
    result
}

/// Merge `source` into `target`.
///
/// Name lists are concatenated without duplicates; existing entries in
/// `target` keep their order.
pub fn merge_split_icon_names(target: &mut SplitIconNames, source: SplitIconNames) {
    for (provider, prefixes) in source {
        let target_prefixes = target.entry(provider).or_default();
        for (prefix, names) in prefixes {
            let list = target_prefixes.entry(prefix).or_default();
            if list.is_empty() {
                *list = names;
                continue;
            }
            let mut seen: HashSet<String> = list.iter().cloned().collect();
            for name in names {
                if seen.insert(name.clone()) {
                    list.push(name);
                }
            }
        }
    }
}

/// Flatten a split structure back into icon identifiers.
pub fn flatten_split_icon_names(split: &SplitIconNames) -> Vec<IconName> {
    split
        .iter()
        .flat_map(|(provider, prefixes)| {
            prefixes.iter().flat_map(move |(prefix, names)| {
                names.iter().map(move |name| {
                    IconName::new(provider.as_str(), prefix.as_str(), name.as_str())
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_single_prefix() {
        let split = split_icon_names(["mdi:home", "mdi:account", "mdi:settings"], false, None);

        let mut expected = SplitIconNames::new();
        expected.entry(String::new()).or_default().insert(
            "mdi".to_string(),
            vec!["home".into(), "account".into(), "settings".into()],
        );
        assert_eq!(split, expected);
    }

    #[test]
    fn test_split_providers_and_prefixes() {
        let split = split_icon_names(
            [
                IconRef::from("@acme:test:foo"),
                IconRef::from("mdi-home"),
                IconRef::from(IconName::new("acme", "test", "bar")),
                IconRef::from("@acme:other:foo"),
            ],
            false,
            None,
        );

        assert_eq!(split.len(), 2);
        assert_eq!(split["acme"]["test"], vec!["foo", "bar"]);
        assert_eq!(split["acme"]["other"], vec!["foo"]);
        assert_eq!(split[""]["mdi"], vec!["home"]);
    }

    #[test]
    fn test_split_drops_invalid_entries() {
        let split = split_icon_names(["", "home", "a:b:c:d", "mdi:"], false, None);
        assert!(split.is_empty());

        let split = split_icon_names(["home"], true, None);
        assert_eq!(split[""][""], vec!["home"]);
    }

    #[test]
    fn test_split_deduplicates_large_lists() {
        let names: Vec<String> = (0..5000).map(|i| format!("mdi:icon-{}", i % 1000)).collect();
        let split = split_icon_names(names, false, None);

        let list = &split[""]["mdi"];
        assert_eq!(list.len(), 1000);
        assert_eq!(list[0], "icon-0");
        assert_eq!(list[999], "icon-999");

        let mut target = split.clone();
        merge_split_icon_names(&mut target, split);
        assert_eq!(target[""]["mdi"].len(), 1000);
    }

    #[test]
    fn test_split_into_existing() {
        let first = split_icon_names(["mdi:home"], false, None);
        let split = split_icon_names(["mdi:home", "mdi:account"], false, Some(first));
        assert_eq!(split[""]["mdi"], vec!["home", "account"]);
    }

    #[test]
    fn test_merge_keeps_target_order() {
        let mut target = split_icon_names(["mdi:b", "mdi:a"], false, None);
        let source = split_icon_names(["mdi:c", "mdi:a", "@p:x:y"], false, None);

        merge_split_icon_names(&mut target, source);
        assert_eq!(target[""]["mdi"], vec!["b", "a", "c"]);
        assert_eq!(target["p"]["x"], vec!["y"]);
    }

    #[test]
    fn test_flatten() {
        let split = split_icon_names(["@acme:test:foo", "mdi:home"], false, None);
        let icons = flatten_split_icon_names(&split);
        assert_eq!(
            icons,
            vec![
                IconName::new("", "mdi", "home"),
                IconName::new("acme", "test", "foo"),
            ]
        );
    }
}
