//! Client-side checks run before any credential leaves the machine.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AuthError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));
static OTP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("otp pattern is valid"));

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

fn invalid(field: &str, message: &str) -> AuthError {
    AuthError::InvalidInput {
        field: field.to_string(),
        message: message.to_string(),
    }
}

pub fn email(email: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(invalid("email", "Email is required"));
    }
    if !EMAIL.is_match(email.trim()) {
        return Err(invalid("email", "Email is invalid"));
    }
    Ok(())
}

pub fn password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(invalid("password", "Password is required"));
    }
    Ok(())
}

pub fn new_password(password: &str) -> Result<(), AuthError> {
    self::password(password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

pub fn username(username: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(invalid("username", "Full name is required"));
    }
    Ok(())
}

pub fn otp(code: &str) -> Result<(), AuthError> {
    if code.is_empty() {
        return Err(invalid("otp", "OTP is required"));
    }
    if !OTP.is_match(code) {
        return Err(invalid("otp", "OTP must be 6 digits"));
    }
    Ok(())
}
