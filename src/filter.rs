//! Selector and filter engine
//!
//! Single-entity reads resolve either by id (direct GET) or by scanning a
//! list for the first item whose natural key equals the configured value.
//! List reads keep remote order and drop items failing any predicate.

use crate::errors;
use crate::framework::diag::{AttrPath, Diagnostic};
use crate::framework::value::Value;
use crate::validators::compile_regex;
use regex::Regex;

/// How a single entity is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<I> {
    /// Direct lookup by id
    Id(I),
    /// Scan by natural key (name, email, display name, target url)
    Key(String),
}

impl<I: Clone> Selector<I> {
    /// Pick the id when known, otherwise the key.
    ///
    /// Schema validation guarantees one of them is set; `None` only
    /// occurs when both are null or deferred.
    pub fn resolve(id: &Value<I>, key: &Value<String>) -> Option<Self> {
        if let Some(id) = id.as_known() {
            return Some(Selector::Id(id.clone()));
        }
        key.as_known().map(|k| Selector::Key(k.clone()))
    }

    /// Like [`Selector::resolve`], reporting a diagnostic at the id
    /// attribute when neither selector is usable
    pub fn require(id: &Value<I>, key: &Value<String>, names: [&str; 2]) -> Result<Self, Diagnostic> {
        Self::resolve(id, key).ok_or_else(|| {
            Diagnostic::attribute(
                AttrPath::root(names[0]),
                "Invalid Attribute Combination",
                format!("One of [{},{}] must be set to a known value", names[0], names[1]),
            )
        })
    }
}

/// First item satisfying `matches`, in list order
pub fn find_first<T, F>(items: Vec<T>, matches: F) -> Option<T>
where
    F: Fn(&T) -> bool,
{
    items.into_iter().find(|item| matches(item))
}

/// First match of a list scan, or a not-found diagnostic for `entity`
pub fn first_match<T, F>(items: Vec<T>, entity: &str, matches: F) -> Result<T, Diagnostic>
where
    F: Fn(&T) -> bool,
{
    let scanned = items.len();
    find_first(items, matches).ok_or_else(|| {
        tracing::debug!(entity, scanned, "list scan found no match");
        errors::not_found(entity)
    })
}

/// Compile an optional name pattern. Null or unknown means "accept all".
pub fn optional_regex(pattern: &Value<String>, attribute: &str) -> Result<Option<Regex>, Diagnostic> {
    match pattern.as_str() {
        None => Ok(None),
        Some(p) => compile_regex(p).map(Some).map_err(|e| {
            Diagnostic::attribute(
                AttrPath::root(attribute),
                "Invalid regular expression",
                format!("{}: {}", attribute, e),
            )
        }),
    }
}

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;

/// Conjunction of predicates applied to a remote list
pub struct ListFilter<'a, T> {
    predicates: Vec<Predicate<'a, T>>,
}

impl<'a, T> Default for ListFilter<'a, T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<'a, T> ListFilter<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unanchored regex match on a string field; unset accepts all
    pub fn regex<F>(mut self, pattern: &Value<String>, attribute: &str, field: F) -> Result<Self, Diagnostic>
    where
        F: Fn(&T) -> &str + Send + Sync + 'a,
    {
        if let Some(re) = optional_regex(pattern, attribute)? {
            self.predicates
                .push(Box::new(move |item| re.is_match(field(item))));
        }
        Ok(self)
    }

    /// Exact equality on a string field; unset accepts all
    pub fn equals<F>(mut self, expected: &Value<String>, field: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'a,
    {
        if let Some(expected) = expected.as_str() {
            let expected = expected.to_string();
            self.predicates
                .push(Box::new(move |item| field(item) == expected));
        }
        self
    }

    /// Membership of a string field in a set; unset accepts all
    pub fn one_of<F>(mut self, allowed: &Value<Vec<String>>, field: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'a,
    {
        if let Some(allowed) = allowed.as_known() {
            let allowed = allowed.clone();
            self.predicates
                .push(Box::new(move |item| allowed.iter().any(|a| a == field(item))));
        }
        self
    }

    /// Arbitrary predicate
    pub fn with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    /// Keep matching items, preserving order
    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}
