//! Validation rules for editable entity fields
//!
//! Every field of a draft is checked; all violations are reported together,
//! one message per field (the first rule of that field that fails).

use std::collections::BTreeMap;

/// Field name -> human readable message
pub type FieldErrors = BTreeMap<String, String>;

/// Punctuation accepted as the "special character" class of a password
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?~`";

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 15;

pub const EMAIL_ERROR: &str = "Please enter a valid email address";
pub const PHONE_LENGTH_ERROR: &str = "Phone number must contain between 7 and 15 digits";
pub const PHONE_FORMAT_ERROR: &str =
    "Phone number may only contain digits, spaces, dashes, parentheses and a leading +";
pub const PASSWORD_LENGTH_ERROR: &str = "Password must be at least 8 characters long";
pub const PASSWORD_COMPOSITION_ERROR: &str = "Password must contain at least one uppercase letter, one lowercase letter, one number and one special character";

/// A single check applied to a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    Email,
    Phone,
    PasswordStrength,
}

impl Rule {
    /// Check a non-empty value. Emptiness is handled by [`validate_fields`].
    pub fn check(&self, value: &str, label: &str) -> Result<(), String> {
        match self {
            Rule::Required => {
                if value.trim().is_empty() {
                    return Err(format!("{} is required", label));
                }
                Ok(())
            }
            Rule::MinLength(min) => {
                if value.trim().chars().count() < *min {
                    return Err(format!("{} must be at least {} characters", label, min));
                }
                Ok(())
            }
            Rule::Email => {
                if is_valid_email(value.trim()) {
                    Ok(())
                } else {
                    Err(EMAIL_ERROR.to_string())
                }
            }
            Rule::Phone => check_phone(value.trim()).map_err(str::to_string),
            Rule::PasswordStrength => check_password(value).map_err(str::to_string),
        }
    }
}

/// Rules for one field of a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub field: &'static str,
    pub label: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.rules.push(Rule::MinLength(min));
        self
    }

    pub fn email(mut self) -> Self {
        self.rules.push(Rule::Email);
        self
    }

    pub fn phone(mut self) -> Self {
        self.rules.push(Rule::Phone);
        self
    }

    pub fn password(mut self) -> Self {
        self.rules.push(Rule::PasswordStrength);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    /// Validate a single value against all rules of the field
    pub fn validate(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            if self.is_required() {
                return Rule::Required.check(value, self.label);
            }
            // optional and empty: nothing else to check
            return Ok(());
        }
        for rule in self.rules.iter().filter(|r| **r != Rule::Required) {
            rule.check(value, self.label)?;
        }
        Ok(())
    }
}

/// Validate every field; `lookup` returns the current value of a field by name.
pub fn validate_fields<'a>(
    rules: &[FieldRules],
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field_rules in rules {
        let value = lookup(field_rules.field).unwrap_or("");
        if let Err(message) = field_rules.validate(value) {
            errors.insert(field_rules.field.to_string(), message);
        }
    }
    errors
}

pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

fn check_phone(value: &str) -> Result<(), &'static str> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PHONE_FORMAT_ERROR);
    }
    let count = digits.chars().count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&count) {
        return Err(PHONE_LENGTH_ERROR);
    }
    Ok(())
}

fn check_password(value: &str) -> Result<(), &'static str> {
    if value.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(PASSWORD_LENGTH_ERROR);
    }
    let has_upper = value.chars().any(|c| c.is_uppercase());
    let has_lower = value.chars().any(|c| c.is_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c));
    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(PASSWORD_COMPOSITION_ERROR)
    }
}
