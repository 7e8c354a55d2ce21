//! Spaces: sets with some structure.
mod index;

pub use index::IndexSpace;

use crate::logging::Loggable;
use rand::distributions::Distribution;
use std::fmt::{Debug, Display};

/// A space: a set of values with some added structure.
///
/// A space is effectively a type with a `contains` predicate and
/// a distribution that samples uniformly-ish from its elements.
pub trait Space: Display + Debug + Distribution<<Self as Space>::Element> {
    /// Type of the elements of this space.
    type Element;

    /// Check whether a particular value is contained in the space.
    fn contains(&self, value: &Self::Element) -> bool;

    /// Represent an element as a loggable value.
    fn as_loggable(&self, value: &Self::Element) -> Loggable;
}
