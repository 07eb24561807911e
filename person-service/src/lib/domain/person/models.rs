use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::person::errors::DateOfBirthError;
use crate::person::errors::EmailError;
use crate::person::errors::NameError;
use crate::person::errors::PasswordPolicyError;
use crate::person::errors::PersonIdError;
use crate::person::errors::PersonStatusError;
use crate::person::errors::UsernameError;

/// Person aggregate entity.
///
/// Represents a registered subject. `password_hash` is the encoded Argon2id
/// string and never leaves the service.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub first_name: Name,
    pub last_name: Name,
    pub email: EmailAddress,
    pub username: Username,
    pub password_hash: String,
    pub status: PersonStatus,
    pub dob: DateOfBirth,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Person unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonId(pub Uuid);

impl PersonId {
    /// Generate a new time-ordered person ID.
    ///
    /// # Returns
    /// PersonId with UUID v7
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a person ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PersonIdError> {
        Uuid::parse_str(s)
            .map(PersonId)
            .map_err(|e| PersonIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name.
///
/// Surrounding whitespace is trimmed; must be non-empty and at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    const MAX_LENGTH: usize = 64;

    pub fn new(name: String) -> Result<Self, NameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cleartext password accepted for a new credential (8-16 characters).
///
/// Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 16;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();

        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Date of birth, written as `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a strict `YYYY-MM-DD` date that is not in the future.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not exactly `YYYY-MM-DD` or not a calendar date
    /// * `InFuture` - Date is after today (UTC)
    pub fn parse(value: &str) -> Result<Self, DateOfBirthError> {
        if value.len() != 10 {
            return Err(DateOfBirthError::InvalidFormat(value.to_string()));
        }

        let date = NaiveDate::parse_from_str(value, Self::FORMAT)
            .map_err(|_| DateOfBirthError::InvalidFormat(value.to_string()))?;

        Self::from_date(date)
    }

    pub fn from_date(date: NaiveDate) -> Result<Self, DateOfBirthError> {
        if date > Utc::now().date_naive() {
            return Err(DateOfBirthError::InFuture);
        }
        Ok(Self(date))
    }

    /// Rebuild a date that was validated when it was first written.
    ///
    /// Clock skew or hand-edited rows must not turn reads into validation failures.
    pub fn from_stored(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.format(Self::FORMAT).fmt(f)
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonStatus {
    #[default]
    Active,
    Inactive,
}

impl PersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Active => "active",
            PersonStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for PersonStatus {
    type Err = PersonStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PersonStatus::Active),
            "inactive" => Ok(PersonStatus::Inactive),
            other => Err(PersonStatusError::Unknown(other.to_string())),
        }
    }
}

/// Command to register a new person with domain types
#[derive(Debug)]
pub struct RegisterPersonCommand {
    pub first_name: Name,
    pub last_name: Name,
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    pub dob: DateOfBirth,
}

/// Command to log in by username or email address.
///
/// The password is not checked against the registration policy so that
/// credentials created under an older policy still work.
pub struct LoginCommand {
    pub identifier: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Command to update the mutable profile fields.
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub first_name: Name,
    pub last_name: Name,
    pub dob: DateOfBirth,
}

/// Command to replace the password of an existing person.
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: Password,
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand").finish_non_exhaustive()
    }
}

/// Access token handed out on successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: i64,
    pub subject: PersonId,
}
