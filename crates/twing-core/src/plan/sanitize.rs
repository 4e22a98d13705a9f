//! Path component sanitization.

/// Linux NAME_MAX.
pub(crate) const NAME_MAX: usize = 255;

/// Makes `value` safe to use as a single path component.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Leaves everything else (spaces, dots, non-ASCII) untouched
///
/// Values that come out empty, `.` or `..` are still unsafe; see [`is_safe_component`].
pub(crate) fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// True if `component` can be joined onto a directory without escaping it.
pub(crate) fn is_safe_component(component: &str) -> bool {
    !component.is_empty() && component != "." && component != ".."
}
