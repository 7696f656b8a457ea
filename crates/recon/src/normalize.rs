/// Canonicalize a raw material code by stripping supplier-appended numeric
/// suffixes: a trailing dot followed by exactly three digits
/// (`"130.000"` → `"130"`, `"AB-12.500"` → `"AB-12"`).
///
/// Suffixes are stripped until none remains, so the function is idempotent
/// even for codes that stack more than one supplier suffix. A code that is
/// nothing but a suffix is left alone (empty canonical codes would be
/// useless as dedup keys; such rows fail catalog resolution instead).
pub fn canonical_code(raw: &str) -> &str {
    let mut code = raw;
    while let Some(stripped) = strip_suffix_once(code) {
        code = stripped;
    }
    code
}

fn strip_suffix_once(code: &str) -> Option<&str> {
    let bytes = code.as_bytes();
    if bytes.len() < 5 {
        return None;
    }
    let split = bytes.len() - 4;
    if bytes[split] == b'.' && bytes[split + 1..].iter().all(|b| b.is_ascii_digit()) {
        Some(&code[..split])
    } else {
        None
    }
}
