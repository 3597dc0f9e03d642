use thiserror::Error;

use crate::{
    catalog::CatalogError, dcdb::AllocationError, string_count::CapacityError,
    string_length::StringLengthError, thermal::ThermalError,
};

/// Any failure of a sizing pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SizingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Thermal(#[from] ThermalError),
    #[error(transparent)]
    StringLength(#[from] StringLengthError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Broad class of a [`SizingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inputs cannot be interpreted: non-numeric or negative catalog
    /// values, inverted temperature ranges, non-positive capacity or counts.
    MalformedInput,
    /// The inputs are well formed but no safe string length exists.
    InvalidConfiguration,
}

impl SizingError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StringLength(_) => ErrorKind::InvalidConfiguration,
            Self::Catalog(_) | Self::Thermal(_) | Self::Capacity(_) | Self::Allocation(_) => {
                ErrorKind::MalformedInput
            }
        }
    }
}
