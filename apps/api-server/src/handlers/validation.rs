//! Signup input checks.

pub const EMAIL_VALIDATION_ERROR: &str = "invalid email";
pub const PASSWORD_VALIDATION_ERROR: &str = "invalid password, should have more than 8 characters, at least 1 symbol, 1 uppercase character and a number";
pub const NAME_VALIDATION_ERROR: &str = "invalid input format";

/// `local@domain.tld` with exactly one `@` and a dot inside the domain.
pub fn is_email_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// More than 8 characters with a digit, an uppercase letter and a symbol.
pub fn is_password_valid(password: &str) -> bool {
    let has_number = password.chars().any(char::is_numeric);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_symbol = password
        .chars()
        .any(|c| c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace()));

    password.chars().count() > 8 && has_number && has_upper && has_symbol
}

pub fn is_name_valid(name: &str) -> bool {
    !name.trim().is_empty()
}
