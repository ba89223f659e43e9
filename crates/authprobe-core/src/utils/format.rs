/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Mask a secret for display, capped at `max_len` stars
pub fn mask(secret: &str, max_len: usize) -> String {
    "*".repeat(secret.chars().count().min(max_len))
}

/// Short description of how long ago a login happened
pub fn welcome_age(minutes: Option<i64>) -> String {
    match minutes {
        None => "restored".to_string(),
        Some(m) if m < 1 => "just now".to_string(),
        Some(m) if m < 60 => format!("{}m ago", m),
        Some(m) => format!("{}h ago", m / 60),
    }
}
