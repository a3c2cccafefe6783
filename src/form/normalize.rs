use deunicode::deunicode;

/// Transliterate `value` to its closest ASCII form, uppercasing it when asked.
///
/// The output is pure ASCII, so normalizing twice yields the same string.
pub fn normalize_case(uppercase: bool, value: &str) -> String {
    let ascii = deunicode(value);
    if uppercase {
        ascii.to_ascii_uppercase()
    } else {
        ascii
    }
}
