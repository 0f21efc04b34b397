/// Collapses every whitespace run (newlines included) to a single space and trims.
///
/// Because line breaks are whitespace too, blank-line runs cannot survive:
/// the output never contains a newline.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
