//! Helpers for handling secrets safely in user-visible output

use std::path::PathBuf;

const VISIBLE_EDGE: usize = 4;

/// Mask a secret for display
///
/// Secrets of up to eight characters are fully replaced by asterisks. Longer
/// secrets keep their first and last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE_EDGE * 2 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..VISIBLE_EDGE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_EDGE..].iter().collect();
    format!(
        "{}{}{}",
        head,
        "*".repeat(chars.len() - VISIBLE_EDGE * 2),
        tail
    )
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
