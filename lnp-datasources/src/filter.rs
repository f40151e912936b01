use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};

use crate::DataSourceError;

/// How a filter's values are compared with a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    #[default]
    Exact,
    #[serde(alias = "sub")]
    Substring,
    #[serde(alias = "re")]
    Regex,
}

impl MatchBy {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
            Self::Regex => "regex",
        }
    }
}

/// A single `filter { name, values, match_by }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub match_by: Option<MatchBy>,
}

impl Filter {
    pub fn exact(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
            match_by: None,
        }
    }

    pub fn with_match_by(mut self, match_by: MatchBy) -> Self {
        self.match_by = Some(match_by);
        self
    }

    fn matcher(&self) -> Result<Matcher, DataSourceError> {
        Ok(match self.match_by.unwrap_or_default() {
            MatchBy::Exact => Matcher::Exact(self.values.clone()),
            MatchBy::Substring => Matcher::Substring(self.values.clone()),
            MatchBy::Regex => Matcher::Regex(
                self.values
                    .iter()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|source| {
                            DataSourceError::InvalidRegex {
                                pattern: pattern.clone(),
                                source,
                            }
                        })
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

enum Matcher {
    Exact(Vec<String>),
    Substring(Vec<String>),
    Regex(Vec<Regex>),
}

impl Matcher {
    /// True if any value matches `actual`.
    fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Exact(values) => values.iter().any(|v| v == actual),
            Self::Substring(values) => {
                values.iter().any(|v| actual.contains(v.as_str()))
            }
            Self::Regex(patterns) => patterns.iter().any(|re| re.is_match(actual)),
        }
    }
}

/// Exposes filterable fields as comparable strings.
pub trait Filterable {
    fn field(&self, name: &str) -> Option<String>;
}

/// The set of fields a data source may be filtered on.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    pub fields: &'static [&'static str],
}

/// Filters checked against a [`FilterConfig`], with patterns compiled.
pub struct FilterSet {
    filters: Vec<(String, Matcher)>,
}

impl FilterConfig {
    /// Reject unknown field names and invalid regexes.
    pub fn compile(&self, filters: &[Filter]) -> Result<FilterSet, DataSourceError> {
        let mut compiled = Vec::with_capacity(filters.len());
        for filter in filters {
            if !self.fields.contains(&filter.name.as_str()) {
                return Err(DataSourceError::InvalidFilter {
                    name: filter.name.clone(),
                    allowed: self.fields.join(", "),
                });
            }
            compiled.push((filter.name.clone(), filter.matcher()?));
        }
        Ok(FilterSet { filters: compiled })
    }

    /// Stable ID for a filter set: base64 of the SHA3-512 of its JSON form.
    pub fn generate_id(&self, filters: &[Filter]) -> Result<String, DataSourceError> {
        let entries: Vec<serde_json::Value> = filters
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "match_by": f.match_by.map(|m| m.as_str()).unwrap_or(""),
                    "values": f.values,
                })
            })
            .collect();
        let encoded = serde_json::to_vec(&entries)?;
        Ok(STANDARD.encode(Sha3_512::digest(&encoded)))
    }
}

impl FilterSet {
    /// Keep the items that satisfy every filter.
    pub fn apply<T: Filterable>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    fn matches<T: Filterable>(&self, item: &T) -> bool {
        self.filters.iter().all(|(name, matcher)| {
            matcher.matches(&item.field(name).unwrap_or_default())
        })
    }
}
