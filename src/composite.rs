//! Per-domain composite states and actions.
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::iter::FromIterator;

/// Name of a sub-environment composed by the orchestrator.
///
/// The built-in domains are [`Domain::CLASSICAL`] and [`Domain::QUANTUM`]
/// but any name may be used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Cow<'static, str>);

impl Domain {
    /// The classical network domain.
    pub const CLASSICAL: Self = Self(Cow::Borrowed("classical"));
    /// The quantum network domain.
    pub const QUANTUM: Self = Self(Cow::Borrowed("quantum"));

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Domain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Domain {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Domain {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// A mapping from domains to values that remembers insertion order.
///
/// Iteration follows the order in which domains were first inserted.
/// Compositions are small (one entry per configured domain) so lookups are linear.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite<T> {
    entries: Vec<(Domain, T)>,
}

/// The most recent observation of every domain.
pub type CompositeState<O> = Composite<O>;

/// One action per domain. Domains may be missing.
pub type CompositeAction<A> = Composite<A>;

impl<T> Default for Composite<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Composite<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value for a domain.
    ///
    /// If the domain is already present its value is replaced in place
    /// (keeping its position) and the old value is returned.
    pub fn insert(&mut self, domain: Domain, value: T) -> Option<T> {
        match self.entries.iter_mut().find(|(d, _)| *d == domain) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((domain, value));
                None
            }
        }
    }

    pub fn get<Q>(&self, domain: &Q) -> Option<&T>
    where
        Domain: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(d, _)| <Domain as Borrow<Q>>::borrow(d) == domain)
            .map(|(_, value)| value)
    }

    pub fn get_mut<Q>(&mut self, domain: &Q) -> Option<&mut T>
    where
        Domain: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter_mut()
            .find(|(d, _)| <Domain as Borrow<Q>>::borrow(d) == domain)
            .map(|(_, value)| value)
    }

    pub fn contains<Q>(&self, domain: &Q) -> bool
    where
        Domain: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(domain).is_some()
    }

    pub fn remove<Q>(&mut self, domain: &Q) -> Option<T>
    where
        Domain: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let index = self
            .entries
            .iter()
            .position(|(d, _)| <Domain as Borrow<Q>>::borrow(d) == domain)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.entries.iter().map(|(d, _)| d)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Domain, &T)> {
        self.entries.iter().map(|(d, value)| (d, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Domain, &mut T)> {
        self.entries.iter_mut().map(|(d, value)| (&*d, value))
    }

    /// Transform every value, keeping domains and order.
    pub fn map<U, F>(self, mut f: F) -> Composite<U>
    where
        F: FnMut(&Domain, T) -> U,
    {
        Composite {
            entries: self
                .entries
                .into_iter()
                .map(|(d, value)| {
                    let value = f(&d, value);
                    (d, value)
                })
                .collect(),
        }
    }

    /// Whether both composites have exactly the same set of domains (in any order).
    pub fn same_domains<U>(&self, other: &Composite<U>) -> bool {
        self.len() == other.len() && self.domains().all(|d| other.contains(d))
    }
}

impl<T> FromIterator<(Domain, T)> for Composite<T> {
    fn from_iter<I: IntoIterator<Item = (Domain, T)>>(iter: I) -> Self {
        let mut composite = Self::new();
        composite.extend(iter);
        composite
    }
}

impl<T> Extend<(Domain, T)> for Composite<T> {
    fn extend<I: IntoIterator<Item = (Domain, T)>>(&mut self, iter: I) {
        for (domain, value) in iter {
            self.insert(domain, value);
        }
    }
}

impl<T> IntoIterator for Composite<T> {
    type Item = (Domain, T);
    type IntoIter = std::vec::IntoIter<(Domain, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
