//! Header resolution for inventory exports.
//!
//! Exporter versions disagree on column names ("CPUs" vs "vCPU", "OS" vs
//! "OS according to the configuration file"). Each canonical field owns an
//! ordered list of matchers; the first matcher that hits any column wins.
//! Every matcher is tried against every column before moving to the next
//! matcher, so a precise alias beats a loose substring hit further left.

use crate::error::{EngineError, Result};
use crate::types::CanonicalField;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A single header test, applied to a lower-cased, trimmed column name.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Equal to one of the aliases.
    Exact(&'static [&'static str]),
    /// Contains any of the fragments.
    ContainsAny(&'static [&'static str]),
    /// Contains `first` and at least one of `rest`.
    ContainsWith(&'static str, &'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            Matcher::Exact(aliases) => aliases.iter().any(|a| header == *a),
            Matcher::ContainsAny(parts) => parts.iter().any(|p| header.contains(p)),
            Matcher::ContainsWith(first, rest) => {
                header.contains(first) && rest.iter().any(|p| header.contains(p))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: CanonicalField,
    pub matchers: Vec<Matcher>,
}

impl FieldRule {
    /// Alias matchers followed by the substring fallback on the field's own name.
    fn new(field: CanonicalField, aliases: Vec<Matcher>) -> Self {
        let mut matchers = aliases;
        matchers.push(Matcher::ContainsAny(fallback_fragment(field)));
        FieldRule { field, matchers }
    }
}

fn fallback_fragment(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Vm => &["vm"],
        CanonicalField::Cpus => &["cpus"],
        CanonicalField::Memory => &["memory"],
        CanonicalField::Os => &["os"],
        CanonicalField::Disk => &["disk"],
    }
}

pub static DEFAULT_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule::new(
            CanonicalField::Vm,
            vec![Matcher::Exact(&["vm", "virtual machine"])],
        ),
        FieldRule::new(CanonicalField::Cpus, vec![Matcher::Exact(&["cpus", "vcpu"])]),
        FieldRule::new(CanonicalField::Memory, vec![Matcher::ContainsAny(&["memory"])]),
        FieldRule::new(
            CanonicalField::Os,
            vec![
                Matcher::ContainsAny(&["os according to"]),
                Matcher::Exact(&["os"]),
            ],
        ),
        FieldRule::new(
            CanonicalField::Disk,
            vec![Matcher::ContainsWith("disk", &["capacity", "mib"])],
        ),
    ]
});

/// Canonical field -> (column index, column name as it appears in the file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: BTreeMap<CanonicalField, (usize, String)>,
}

impl ColumnMap {
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).map(|(idx, _)| *idx)
    }

    pub fn column_name(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.columns.iter().map(|(f, (_, name))| (*f, name.as_str()))
    }
}

/// Resolve `headers` with the default rule set.
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMap> {
    resolve_with_rules(headers, &DEFAULT_RULES)
}

/// Resolve `headers` against `rules`. Either every required field resolves
/// or the call fails naming all of the unresolved ones.
pub fn resolve_with_rules<S: AsRef<str>>(headers: &[S], rules: &[FieldRule]) -> Result<ColumnMap> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| clean_header(h.as_ref()).to_lowercase())
        .collect();

    let mut map = ColumnMap::default();
    let mut missing = Vec::new();
    for rule in rules {
        let hit = rule.matchers.iter().find_map(|m| {
            normalized.iter().position(|h| m.matches(h))
        });
        match hit {
            Some(idx) => {
                let original = clean_header(headers[idx].as_ref()).to_string();
                log::debug!("column '{}' resolved to '{}'", rule.field, original);
                map.columns.insert(rule.field, (idx, original));
            }
            None if rule.field.is_required() => missing.push(rule.field),
            None => log::debug!("optional column '{}' not present", rule.field),
        }
    }

    if missing.is_empty() {
        Ok(map)
    } else {
        Err(EngineError::MissingColumn { fields: missing })
    }
}

/// Trim whitespace and a leading byte-order mark.
pub fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}
