use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Greater than zero.
///
/// Any `PartialOrd + Zero` type qualifies, so plain numbers and `uom`
/// quantities share the rule:
///
/// ```
/// use stringwise_core::constraint::StrictlyPositive;
/// use uom::si::{electric_potential::volt, f64::ElectricPotential};
///
/// let vmp = StrictlyPositive::new(ElectricPotential::new::<volt>(40.5)).unwrap();
/// assert_eq!(vmp.as_ref().get::<volt>(), 40.5);
///
/// assert!(StrictlyPositive::new(ElectricPotential::new::<volt>(-1.0)).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Shorthand for `Constrained::<T, StrictlyPositive>::new`.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::Zero`], [`ConstraintError::Negative`], or
    /// [`ConstraintError::NotANumber`] when `value` is unordered against zero.
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Constrained<T, Self>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        let Some(ordering) = value.partial_cmp(&T::zero()) else {
            return Err(ConstraintError::NotANumber);
        };
        match ordering {
            Ordering::Greater => Ok(()),
            Ordering::Equal => Err(ConstraintError::Zero),
            Ordering::Less => Err(ConstraintError::Negative),
        }
    }
}
