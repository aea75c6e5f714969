//! Smart-join: concatenating rendered sibling fragments.
//!
//! Problem descriptions mix inline and block elements freely, so naive
//! concatenation produces `wordword` at element boundaries. A single space is
//! inserted only where two word-ish fragments would otherwise touch.

/// Characters that can end or start a "word" for joining purposes.
///
/// Besides ASCII alphanumerics this covers the closing characters of
/// inline Markdown constructs (code spans, link text, emphasis).
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '`' | ']' | '*' | '_')
}

/// Punctuation that hugs the preceding word.
pub fn is_closing_punct(c: char) -> bool {
    matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | ')')
}

/// Punctuation that hugs the following word.
pub fn is_opening_punct(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '“' | '‘')
}

/// Whether a space belongs between `left` and `right`.
pub fn needs_space(left: &str, right: &str) -> bool {
    let (Some(last), Some(first)) = (left.chars().next_back(), right.chars().next()) else {
        return false;
    };

    is_word_char(last) && is_word_char(first) && !is_closing_punct(first) && !is_opening_punct(last)
}

/// Append `fragment` to `out`, inserting a space if the boundary needs one.
pub fn push_joined(out: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if needs_space(out, fragment) {
        out.push(' ');
    }
    out.push_str(fragment);
}

/// Join fragments left to right with [`push_joined`].
///
/// # Examples
///
/// ```
/// use leetdown::markdown::smart_join;
///
/// assert_eq!(smart_join(["foo", "bar"]), "foo bar");
/// assert_eq!(smart_join(["foo", ".bar"]), "foo.bar");
/// assert_eq!(smart_join(["(", "foo"]), "(foo");
/// ```
pub fn smart_join<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for fragment in fragments {
        push_joined(&mut out, fragment.as_ref());
    }
    out
}
