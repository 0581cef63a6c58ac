use std::path::Path;

use crate::error::*;
use crate::path::strip_root;

/// Represents a glob pattern component that may contain a wildcard
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WildcardComponent {
    /// A double wildcard ("**") that matches zero or more path segments
    DoubleWildcard,
    /// A single wildcard component, with optional prefix and suffix
    Wildcard {
        /// Text before the wildcard (if any)
        prefix: Option<String>,
        /// Text after the wildcard (if any)
        suffix: Option<String>,
    },
    /// A normal path component with no wildcards
    Normal(String),
}

impl WildcardComponent {
    /// Check if this component matches the given name
    pub(crate) fn match_component<S: AsRef<str>>(&self, name: S) -> bool {
        let name = name.as_ref();

        match self {
            WildcardComponent::DoubleWildcard => true,
            WildcardComponent::Wildcard { prefix, suffix } => {
                let prefix_str = prefix.as_deref().unwrap_or("");
                let suffix_str = suffix.as_deref().unwrap_or("");

                name.len() >= prefix_str.len() + suffix_str.len()
                    && name.starts_with(prefix_str)
                    && name.ends_with(suffix_str)
            }
            WildcardComponent::Normal(pattern) => name == pattern,
        }
    }
}

/// Parse a glob pattern into WildcardComponents. A leading root component
/// is ignored so "/a/*.rs" and "a/*.rs" mean the same thing.
pub(crate) fn parse_glob<P: AsRef<Path>>(pattern: P) -> Result<Vec<WildcardComponent>> {
    let path = strip_root(pattern);
    let mut components = Vec::new();

    let component_strings: Vec<String> = path
        .components()
        .map(|c| match c {
            std::path::Component::Normal(os_str) => os_str
                .to_str()
                .map(|s| s.to_string())
                .ok_or_else(|| Error::invalid_component(os_str)),
            _ => Err(Error::invalid_component(&path)),
        })
        .collect::<Result<Vec<String>>>()?;

    for component_str in component_strings.iter() {
        if component_str == "**" {
            components.push(WildcardComponent::DoubleWildcard);
            continue;
        }

        if component_str.contains('*') {
            let asterisk_count = component_str.chars().filter(|&c| c == '*').count();

            if asterisk_count > 1 {
                return Err(Error::multiple_wildcards(component_str));
            }

            let wildcard_idx = component_str.find('*').expect("wildcard case");
            let prefix = if wildcard_idx > 0 {
                Some(component_str[..wildcard_idx].to_string())
            } else {
                None
            };

            let suffix = if wildcard_idx < component_str.len() - 1 {
                Some(component_str[wildcard_idx + 1..].to_string())
            } else {
                None
            };

            components.push(WildcardComponent::Wildcard { prefix, suffix });
        } else {
            components.push(WildcardComponent::Normal(component_str.clone()));
        }
    }

    if components.is_empty() {
        return Err(Error::EmptyPattern);
    }

    Ok(components)
}

/// Matches pattern components against path segments. A DoubleWildcard may
/// consume zero or more segments; every other component consumes exactly one.
fn match_segments(pattern: &[WildcardComponent], segments: &[&str]) -> bool {
    match pattern.split_first() {
        None => segments.is_empty(),
        Some((WildcardComponent::DoubleWildcard, rest)) => {
            (0..=segments.len()).any(|skip| match_segments(rest, &segments[skip..]))
        }
        Some((head, rest)) => segments
            .split_first()
            .is_some_and(|(first, tail)| head.match_component(first) && match_segments(rest, tail)),
    }
}

/// A compiled set of include and exclude patterns.
///
/// A path is selected when it matches at least one include pattern and
/// no exclude pattern. Matching is component-wise against the path with
/// its root stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobSet {
    includes: Vec<Vec<WildcardComponent>>,
    excludes: Vec<Vec<WildcardComponent>>,
}

impl GlobSet {
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self> {
        Ok(GlobSet {
            includes: includes
                .iter()
                .map(|p| parse_glob(p.as_ref()))
                .collect::<Result<Vec<_>>>()?,
            excludes: excludes
                .iter()
                .map(|p| parse_glob(p.as_ref()))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        let stripped = strip_root(path);
        let segments: Vec<&str> = stripped
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(os_str) => os_str.to_str(),
                _ => None,
            })
            .collect();

        self.includes
            .iter()
            .any(|pattern| match_segments(pattern, &segments))
            && !self
                .excludes
                .iter()
                .any(|pattern| match_segments(pattern, &segments))
    }
}
