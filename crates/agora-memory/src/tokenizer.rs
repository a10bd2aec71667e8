/// Normalize text into lowercase alphanumeric tokens.
///
/// Every character outside `[a-z0-9]` and whitespace (after lowercasing)
/// acts as a separator, so `"Self-Attention!"` becomes `["self", "attention"]`.
/// Empty and all-punctuation input yield no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized.split_whitespace().map(str::to_string).collect()
}
