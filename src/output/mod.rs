// Output formatting: terminal display of topics, metrics and neighbours.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Respects UTF-8 character boundaries, so multi-byte characters never cause
/// a panic.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// A fixed-width `[====    ]` bar for a weight in [0, 1].
pub fn weight_bar(weight: f64, width: usize) -> String {
    let filled = ((weight.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_weight_bar() {
        assert_eq!(weight_bar(0.5, 4), "[==  ]");
        assert_eq!(weight_bar(2.0, 3), "[===]");
        assert_eq!(weight_bar(-1.0, 2), "[  ]");
    }
}
