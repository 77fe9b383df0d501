//! Login, registration and password change forms.

use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Login credentials for the Booking API.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use hotelbook::Credentials;
///
/// let creds = Credentials::new("  alice ", "s3cret-pass");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials. Surrounding whitespace in the username is dropped.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Check that both fields are filled in.
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.is_empty() {
            return Err(required("username"));
        }
        if self.password.is_empty() {
            return Err(required("password"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account registration form.
#[derive(Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into().trim().to_string(),
            email: email.into().trim().to_string(),
            password_confirm: password.clone(),
            password,
            ..Self::default()
        }
    }

    /// Check the form the way the registration page does before submitting.
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.is_empty() {
            return Err(required("username"));
        }
        if self.email.is_empty() {
            return Err(required("email"));
        }
        if self.password != self.password_confirm {
            return Err(InvalidInputError::Field {
                field: "password_confirm",
                reason: "passwords do not match".to_string(),
            }
            .into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InvalidInputError::Field {
                field: "password",
                reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Password change form.
#[derive(Clone)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl PasswordChange {
    pub fn new(old_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        let new_password = new_password.into();
        Self {
            old_password: old_password.into(),
            new_password_confirm: new_password.clone(),
            new_password,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.old_password.is_empty() {
            return Err(required("old_password"));
        }
        if self.new_password != self.new_password_confirm {
            return Err(InvalidInputError::Field {
                field: "new_password_confirm",
                reason: "passwords do not match".to_string(),
            }
            .into());
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InvalidInputError::Field {
                field: "new_password",
                reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

fn required(field: &'static str) -> Error {
    InvalidInputError::Field {
        field,
        reason: "is required".to_string(),
    }
    .into()
}
