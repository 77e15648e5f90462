//! Text canonicalization for comparison and key derivation.

/// Canonicalize a name for fuzzy comparison and dedup keys: lowercase,
/// strip everything outside the letter/digit/space set, trim, collapse
/// internal whitespace runs to a single space. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            pending_space = true;
        } else if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
        // Punctuation is dropped without starting a new token.
    }

    out
}

/// Canonicalize an email: lowercase and trim only. Emails carry meaningful
/// punctuation, so nothing is stripped.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
