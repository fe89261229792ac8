//! Client-side form validation.
//!
//! Anything rejected here never reaches the network; the auth service
//! re-validates everything it receives, so these checks exist only to give
//! the user an immediate, local error.

use ancora_domain::identifier::{self, Identifier};

pub const CODE_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("enter your phone number or email")]
    MissingIdentifier,
    #[error("enter a valid phone number (+ and digits) or email")]
    InvalidIdentifier,
    #[error("the code has {CODE_LEN} digits")]
    InvalidCode,
    #[error("enter your password")]
    MissingPassword,
    #[error("password must have at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("enter your first and last name")]
    MissingName,
    #[error("enter a valid tax id (11 digits)")]
    InvalidTaxId,
    #[error("enter a valid email")]
    InvalidEmail,
}

/// Step one: the identifier field.
pub fn validate_identifier(raw: &str) -> Result<Identifier, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::MissingIdentifier);
    }
    Identifier::parse(raw).ok_or(FormError::InvalidIdentifier)
}

/// Step two: the verification code field. Returns the trimmed code.
pub fn validate_code(raw: &str) -> Result<String, FormError> {
    let code = raw.trim();
    if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormError::InvalidCode);
    }
    Ok(code.to_string())
}

/// Password login: only presence is checked locally.
pub fn validate_login_password(raw: &str) -> Result<(), FormError> {
    if raw.is_empty() {
        return Err(FormError::MissingPassword);
    }
    Ok(())
}

/// New-password fields (quick registration and the forced set-password step).
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

/// The abbreviated registration form.
#[derive(Debug, Clone, Default)]
pub struct QuickRegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub password: String,
    pub password_confirmation: String,
    pub invite_code: String,
}

/// Validated registration payload, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationData {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub password: String,
    pub invite_code: Option<String>,
}

impl QuickRegisterForm {
    pub fn validate(&self) -> Result<RegistrationData, FormError> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(FormError::MissingName);
        }

        let phone = identifier::normalize_phone(&self.phone);
        if !identifier::is_valid_phone(&phone) {
            return Err(FormError::InvalidIdentifier);
        }

        let email = self.email.trim().to_ascii_lowercase();
        if !identifier::is_valid_email(&email) {
            return Err(FormError::InvalidEmail);
        }

        if !identifier::is_valid_tax_id(&self.tax_id) {
            return Err(FormError::InvalidTaxId);
        }

        validate_new_password(&self.password, &self.password_confirmation)?;

        let invite_code = self.invite_code.trim();
        Ok(RegistrationData {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone,
            email,
            tax_id: self.tax_id.chars().filter(|c| c.is_ascii_digit()).collect(),
            password: self.password.clone(),
            invite_code: (!invite_code.is_empty()).then(|| invite_code.to_ascii_uppercase()),
        })
    }
}
