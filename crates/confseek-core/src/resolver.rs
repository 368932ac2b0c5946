//! Setting selection and search over a configuration tree
//!
//! A [`Resolver`] is an immutable query builder. Each builder method
//! consumes the resolver and returns a new one, so the order in which the
//! predicate and key mode are set never changes the outcome:
//!
//! ```text
//! select_setting(path) → [matching(field, value)] → [with_key_output()] → evaluate(field)
//! ```
//!
//! Evaluation dispatches on the resolver state:
//!
//! 1. nothing selected: the whole tree
//! 2. empty field: the selected subtree
//! 3. no predicate: direct lookup of `field`
//! 4. selected subtree is a non-empty sequence: record search
//! 5. otherwise: predicate lookup in a flat mapping
//!
//! Misses are reported as [`Lookup::NotFound`], never as errors.

use crate::error::{Error, Result};
use crate::value::{Key, Value};

/// Separator between path segments in a setting selector
pub const PATH_SEPARATOR: char = '.';

/// Outcome of evaluating a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// A value from the tree (a scalar, a mapping, a sequence or the tree itself)
    Value(&'a Value),
    /// The key under which a matching value was found
    Key(Key<'a>),
    /// Nothing matched
    NotFound,
}

impl<'a> Lookup<'a> {
    /// Check if the lookup produced a value or a key
    pub fn is_found(&self) -> bool {
        !self.is_not_found()
    }

    /// Check if the lookup missed
    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    /// Get the found value, if this lookup produced one
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Lookup::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the found key, if this lookup produced one
    pub fn key(&self) -> Option<Key<'a>> {
        match self {
            Lookup::Key(k) => Some(*k),
            _ => None,
        }
    }

    /// Convert a found value or key into an owned [`Value`]
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Lookup::Value(v) => Some((*v).clone()),
            Lookup::Key(k) => Some(k.to_value()),
            Lookup::NotFound => None,
        }
    }
}

impl<'a> From<Option<&'a Value>> for Lookup<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Value)
    }
}

impl<'a> From<Option<Key<'a>>> for Lookup<'a> {
    fn from(key: Option<Key<'a>>) -> Self {
        key.map_or(Lookup::NotFound, Lookup::Key)
    }
}

/// Field/value pair constraining a search
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    field: String,
    value: Option<Value>,
}

impl Predicate {
    fn is_active(&self) -> bool {
        !self.field.is_empty()
    }
}

/// Immutable query over a borrowed configuration tree
///
/// # Example
///
/// ```rust
/// use confseek_core::{Resolver, Value};
///
/// let tree: Value = serde_yaml::from_str(r#"
/// regions:
///   - { code: eu, endpoint: eu.example.com }
///   - { code: us, endpoint: us.example.com }
/// "#).unwrap();
///
/// let endpoint = Resolver::new(&tree)
///     .select_setting("regions")
///     .unwrap()
///     .matching("code", Some("us".into()))
///     .evaluate("endpoint");
///
/// assert_eq!(endpoint.value().and_then(Value::as_str), Some("us.example.com"));
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    /// The full configuration tree
    tree: &'a Value,
    /// Subtree reached by the last successful `select_setting`
    selected: Option<&'a Value>,
    predicate: Option<Predicate>,
    key_output: bool,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a configuration tree
    pub fn new(tree: &'a Value) -> Self {
        Self {
            tree,
            selected: None,
            predicate: None,
            key_output: false,
        }
    }

    /// Select the subtree at a dot-separated path.
    ///
    /// Navigation always starts at the root of the tree, replacing any
    /// earlier selection. Every segment must name an existing key (or a
    /// sequence index); keys holding `null`, `false`, `0`, `""` or an empty
    /// collection count as existing.
    ///
    /// # Errors
    ///
    /// Returns a `SettingNotConfigured` error naming the full path, the
    /// failing segment and the keys available at that depth.
    pub fn select_setting(self, path: &str) -> Result<Self> {
        let mut current = self.tree;

        for segment in path.split(PATH_SEPARATOR) {
            current = match current.get(segment) {
                Some(child) => child,
                None => {
                    let available = current.keys();
                    log::debug!(
                        "Setting '{}' not configured: no '{}' among [{}]",
                        path,
                        segment,
                        available.join(", ")
                    );
                    return Err(Error::setting_not_configured(path, segment, available));
                }
            };
        }

        log::debug!("Selected setting '{}' ({})", path, current.type_name());

        Ok(Self {
            selected: Some(current),
            ..self
        })
    }

    /// Return the matching key instead of the matching value
    pub fn with_key_output(self, flag: bool) -> Self {
        Self {
            key_output: flag,
            ..self
        }
    }

    /// Constrain evaluation to entries whose `field` strictly equals `value`.
    ///
    /// An empty `field` leaves the resolver without an active predicate.
    pub fn matching(self, field: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            predicate: Some(Predicate {
                field: field.into(),
                value,
            }),
            ..self
        }
    }

    /// Constrain by `field`/`value` and evaluate `field` in one step.
    ///
    /// Passing `None` keeps the predicate active without a value. On a flat
    /// mapping this yields [`Lookup::NotFound`] in value mode rather than
    /// falling back to a direct lookup of `field`; use `evaluate` without a
    /// predicate for that.
    pub fn search(self, field: &str, value: Option<Value>) -> Lookup<'a> {
        self.matching(field, value).evaluate(field)
    }

    /// Evaluate the query.
    ///
    /// With no selection the whole tree is returned, and an empty `field`
    /// returns the selected subtree; in both cases the predicate is ignored.
    pub fn evaluate(&self, field: &str) -> Lookup<'a> {
        let Some(selected) = self.selected else {
            log::trace!("No setting selected, returning the whole tree");
            return Lookup::Value(self.tree);
        };

        if field.is_empty() {
            return Lookup::Value(selected);
        }

        match self.predicate.as_ref().filter(|p| p.is_active()) {
            None => self.direct_lookup(selected, field),
            Some(predicate) if selected.is_record_list() => {
                self.record_search(selected, field, predicate)
            }
            Some(predicate) => self.flat_lookup(selected, field, predicate),
        }
    }

    /// Lookup without a predicate. In key mode `field` is the sought value.
    fn direct_lookup(&self, selected: &'a Value, field: &str) -> Lookup<'a> {
        log::trace!("Direct lookup of '{}'", field);
        if self.key_output {
            selected.find_key(&Value::from(field)).into()
        } else {
            selected.get(field).into()
        }
    }

    /// Predicate lookup in a single mapping
    fn flat_lookup(&self, selected: &'a Value, field: &str, predicate: &Predicate) -> Lookup<'a> {
        log::trace!("Flat lookup of '{}' where {:?}", field, predicate);
        if self.key_output {
            return match &predicate.value {
                Some(wanted) => selected.find_key(wanted).into(),
                None => selected.find_key(&Value::from(field)).into(),
            };
        }

        match (selected.get(field), &predicate.value) {
            (Some(found), Some(wanted)) if found == wanted => Lookup::Value(found),
            _ => Lookup::NotFound,
        }
    }

    /// Predicate search over a sequence of records; the first match wins
    fn record_search(&self, selected: &'a Value, field: &str, predicate: &Predicate) -> Lookup<'a> {
        log::trace!("Record search for '{}' where {:?}", field, predicate);
        let (Value::Sequence(records), Some(wanted)) = (selected, &predicate.value) else {
            return Lookup::NotFound;
        };

        let matched = records
            .iter()
            .find(|record| record.get(&predicate.field) == Some(wanted));

        match matched {
            Some(record) if self.key_output => record.find_key(wanted).into(),
            Some(record) => record.get(field).into(),
            None => Lookup::NotFound,
        }
    }
}
