use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};

/// A set of permission codes, e.g. `{"PRODUCT.VIEW", "ORDER.CREATE"}`.
///
/// Backed by a `BTreeSet` so that iteration order (and therefore the joined claim string) is
/// deterministic for a given set. Codes are stored as supplied; [`crate::claims::decode`]
/// normalises to upper case, so policy checks against canonical upper-case codes are effectively
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, code: S) -> bool {
        self.0.insert(code.into())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Folds another set into this one. Used when a user carries more than one permission claim
    /// (one per role) and the middleware unions the decoded sets.
    pub fn merge(&mut self, other: PermissionSet) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The comma-joined representation that gets compressed into the claim token.
    pub fn to_claim_string(&self) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Display for PermissionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_claim_string())
    }
}
