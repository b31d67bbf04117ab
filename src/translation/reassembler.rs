/*!
 * Output sanitizing and reassembly.
 *
 * Translations coming back from a model are stripped of anything outside
 * the printable set, then interleaved with the separators captured during
 * segmentation to rebuild the original layout.
 */

/// Whether a character belongs to the printable output set.
///
/// The set is ASCII `0x20..=0x7E` plus tab, line feed, carriage return,
/// vertical tab and form feed. Anything else, including non-ASCII letters,
/// is dropped from model output.
pub fn is_printable(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Remove every non-printable character from `text`
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&ch| is_printable(ch)).collect()
}

/// Interleave sanitized translations with separators.
///
/// Produces `t[0] + s[0] + t[1] + s[1] + ...`; whichever sequence runs out
/// first contributes empty strings for the remaining positions.
pub fn reassemble<T, S>(translations: &[T], separators: &[S]) -> String
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    let positions = translations.len().max(separators.len());
    let capacity = translations.iter().map(|t| t.as_ref().len()).sum::<usize>()
        + separators.iter().map(|s| s.as_ref().len()).sum::<usize>();

    let mut output = String::with_capacity(capacity);
    for index in 0..positions {
        if let Some(translation) = translations.get(index) {
            output.push_str(&sanitize(translation.as_ref()));
        }
        if let Some(separator) = separators.get(index) {
            output.push_str(separator.as_ref());
        }
    }

    output
}
