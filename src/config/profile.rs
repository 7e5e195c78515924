pub fn resolve_profile(requested: &str) -> String {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_is_default() {
        assert_eq!(resolve_profile("  "), "default");
        assert_eq!(resolve_profile(" work "), "work");
    }
}
