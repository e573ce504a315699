/// Converts a language integer to a host index.
///
/// # Parameters
/// - `value`: The integer to convert.
/// - `error`: The error returned when `value` is negative.
///
/// ## Example
/// ```
/// use arrai::util::num::int_to_size;
///
/// assert_eq!(int_to_size(3, "negative"), Ok(3));
/// assert_eq!(int_to_size(-1, "negative"), Err("negative"));
/// ```
pub fn int_to_size<E>(value: i32, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}

/// Converts a host length to a language integer.
///
/// # Parameters
/// - `value`: The length to convert.
/// - `error`: The error returned when `value` does not fit an `i32`.
pub fn size_to_int<E>(value: usize, error: E) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| error)
}
