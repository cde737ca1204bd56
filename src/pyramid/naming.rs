//! Output name derivation and callback-name validation.

/// Characters that may not appear in a callback name.
pub const FORBIDDEN_IDENTIFIER_CHARS: &[char] = &[
    '\'', '^', '£', '%', '&', '*', '(', ')', '}', '{', '@', '#', '~', '?', '>', '<', ',', '|', '=',
    '+', '¬', '-',
];

/// Reduce a file stem to `[A-Za-z0-9_]`.
///
/// Leading and trailing whitespace is trimmed, every character outside
/// `[A-Za-z0-9 ]` is dropped, and each run of spaces becomes a single `_`.
///
/// ```
/// use dzi_tiler::pyramid::sanitize_name;
///
/// assert_eq!(sanitize_name("My Photo #1"), "My_Photo_1");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let mut clean = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
    {
        if c == ' ' {
            if !in_space {
                clean.push('_');
            }
            in_space = true;
        } else {
            clean.push(c);
            in_space = false;
        }
    }

    clean
}

/// Whether `name` can be used as the callback of the `.js` descriptor.
///
/// The name must be non-empty, must not start with a decimal digit, and must
/// not contain whitespace or any of [`FORBIDDEN_IDENTIFIER_CHARS`].
pub fn is_valid_identifier(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };

    if first.is_ascii_digit() {
        return false;
    }

    !name
        .chars()
        .any(|c| c.is_whitespace() || FORBIDDEN_IDENTIFIER_CHARS.contains(&c))
}
