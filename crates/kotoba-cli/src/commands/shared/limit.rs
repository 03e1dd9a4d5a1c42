/// Compute effective limit with precedence: local arg -> global flag -> configured default.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

/// Keep at most `limit` rows.
pub fn truncate<T>(rows: &mut Vec<T>, limit: u32) {
    rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
}
