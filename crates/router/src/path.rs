//! URL path patterns: literal segments plus `:name` placeholders.

use std::borrow::Cow;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::RouteTableError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, RouteTableError> {
        let invalid = |reason: &str| RouteTableError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = raw.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        if raw.contains(['?', '#']) {
            return Err(invalid("must not contain a query or fragment"));
        }

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                match part.strip_prefix(':') {
                    Some("") => return Err(invalid("placeholder needs a name")),
                    Some(name) => {
                        if segments.iter().any(|s| matches!(s, Segment::Param(p) if p == name)) {
                            return Err(invalid("placeholder names must be unique"));
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None if part.is_empty() => return Err(invalid("empty segment")),
                    None => segments.push(Segment::Literal(part.to_string())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_parameterized(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Param(_)))
    }

    /// Match a normalized path (see [`split_url`]).
    ///
    /// Literal segments compare ASCII case-insensitively; placeholders take
    /// exactly one non-empty segment and capture its percent-decoded value.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts = path_segments(path);
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit.eq_ignore_ascii_case(part) => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part).unwrap_or(Cow::Borrowed(part));
                    params.push(name.clone(), value.into_owned());
                }
            }
        }
        Some(params)
    }
}

impl core::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Values captured by placeholders, in pattern order.
///
/// Serializes as a JSON object keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl Serialize for RouteParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl RouteParams {
    fn push(&mut self, name: String, value: String) {
        self.0.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Split a requested URL into its normalized path and raw query.
///
/// The fragment is dropped, an empty path becomes `/`, and a trailing slash
/// is removed from anything but the root.
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    let without_fragment = url.split_once('#').map_or(url, |(before, _)| before);
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query).filter(|q| !q.is_empty())),
        None => (without_fragment, None),
    };

    let path = if path.is_empty() { "/" } else { path };
    let path = if path.len() > 1 { path.strip_suffix('/').unwrap_or(path) } else { path };
    (path, query)
}

/// The normalized path with its query re-attached; what guards see as the
/// requested location.
pub fn requested_url(url: &str) -> String {
    match split_url(url) {
        (path, Some(query)) => format!("{path}?{query}"),
        (path, None) => path.to_string(),
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    }
}
