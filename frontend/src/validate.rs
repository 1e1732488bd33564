//! Client-side form validation, applied before any network call.

pub const MIN_PASSWORD_LEN: usize = 6;

/// Same acceptance rule as the login form has always used: one `@`, no
/// whitespace, and a dot somewhere inside the domain part.
pub fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    let bytes = domain.as_bytes();
    bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'.' && i > 0 && i + 1 < bytes.len())
}

pub fn valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Moderate,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Moderate => "Moderate",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// Hint shown under the registration password field.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.len() < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
    if has_upper && has_digit && has_symbol {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Moderate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(valid_email("a@b.com"));
        assert!(valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!valid_email(""));
        assert!(!valid_email("plainaddress"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a@.com"));
        assert!(!valid_email("@b.com"));
        assert!(!valid_email("a@b.com@c.com"));
        assert!(!valid_email("a b@c.com"));
        assert!(!valid_email("a@b .com"));
        assert!(!valid_email("a@b."));
    }

    #[test]
    fn password_length_gate() {
        assert!(!valid_password("12345"));
        assert!(valid_password("123456"));
    }

    #[test]
    fn strength_tiers() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefg"), PasswordStrength::Moderate);
        assert_eq!(password_strength("Abcdef7"), PasswordStrength::Moderate);
        assert_eq!(password_strength("Abcdef7!"), PasswordStrength::Strong);
    }
}
