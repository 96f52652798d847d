pub fn is_dismiss_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

/// What to put back on `body.style.overflow` when a scroll lock ends.
/// `None` means the property was never set inline and should be removed.
pub fn restored_overflow(previous: &str) -> Option<&str> {
    let previous = previous.trim();
    (!previous.is_empty()).then_some(previous)
}
