// Log field masking for user identifiers and credentials

/// Masks an email address down to its first character and domain,
/// e.g. `user@example.com` becomes `u***@example.com`.
pub fn safe_email_log(email: &str) -> String {
    const MASKED: &str = "***@***.***";

    match email.split_once('@') {
        Some((local, domain)) if email.len() > 3 && !domain.contains('@') => {
            match local.chars().next() {
                Some(first) => format!("{}***@{}", first, domain),
                None => MASKED.to_string(),
            }
        }
        _ => MASKED.to_string(),
    }
}

/// Keeps the first and last four characters of a token.
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}
