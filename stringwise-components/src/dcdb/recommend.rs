/// DCDB string-input counts commonly stocked by manufacturers.
pub const STANDARD_DCDB_SIZES: [u32; 6] = [8, 12, 16, 20, 24, 32];

/// Returns the smallest standard DCDB that holds `strings_per_dcdb` strings.
///
/// Returns `None` when even the largest standard size is too small; the
/// caller should add DCDBs rather than pick a size that does not fit.
#[must_use]
pub fn recommend_dcdb_size(strings_per_dcdb: u32) -> Option<u32> {
    STANDARD_DCDB_SIZES
        .into_iter()
        .find(|&size| size >= strings_per_dcdb)
}
