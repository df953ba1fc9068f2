/// Maximum length, in characters, of any free-text field.
pub const MAX_TEXT_LEN: usize = 100;

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} é obrigatório"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} deve ter no máximo {max_len} caracteres"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} deve ter no máximo {max_len} caracteres"));
    }
    None
}
