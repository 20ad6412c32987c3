/// Numeric conversion helpers.
///
/// Script numbers are `f64`. These helpers convert them to and from the
/// integer types used for indexing without silently truncating or rounding.
pub mod num;
