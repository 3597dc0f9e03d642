//! Numeric invariants checked once, when a value enters the engine.
//!
//! Catalog data arrives loosely typed. Each physical quantity is checked when
//! it is resolved, and the guarantee then travels with the value as
//! [`Constrained<T, C>`]. Only [`StrictlyPositive`] is needed today: it marks
//! voltages, currents, power ratings and target capacities.

mod strictly_positive;

use std::{fmt, marker::PhantomData};

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use strictly_positive::StrictlyPositive;

/// A rule a value must satisfy before it can be wrapped.
pub trait Constraint<T> {
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing how `value` breaks the rule.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// Why a value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value is negative")]
    Negative,
    #[error("value is zero")]
    Zero,
    #[error("value is NaN")]
    NotANumber,
}

/// A value of type `T` known to satisfy constraint `C`.
///
/// ```
/// use stringwise_core::constraint::{Constrained, StrictlyPositive};
///
/// let isc = Constrained::<f64, StrictlyPositive>::new(11.2).unwrap();
/// assert_eq!(isc.get(), 11.2);
///
/// assert!(Constrained::<f64, StrictlyPositive>::new(-0.5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    rule: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Wraps `value` after checking it against `C`.
    ///
    /// # Errors
    ///
    /// Returns whatever `C::check` reports.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value).map(|()| Self {
            value,
            rule: PhantomData,
        })
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug, C: Constraint<T>> fmt::Debug for Constrained<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Serialized as the bare value.
impl<T: Serialize, C: Constraint<T>> Serialize for Constrained<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
