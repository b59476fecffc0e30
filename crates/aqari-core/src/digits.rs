//! Eastern Arabic-Indic digit handling.
//!
//! Senders type menu choices in either ASCII digits or Arabic-Indic
//! digits (U+0660–U+0669). Everything downstream of the transport works
//! on normalized ASCII.

/// Map every Eastern Arabic-Indic digit to its ASCII counterpart.
/// All other characters pass through unchanged.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => {
                let offset = c as u32 - 0x0660;
                char::from_digit(offset, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// True iff `text` is non-empty and every character is an ASCII digit
/// or an Eastern Arabic-Indic digit.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || ('\u{0660}'..='\u{0669}').contains(&c))
}
