//! Form validation rules shared by the request models.
//!
//! Field-level rules plug into `validator` derives through
//! `#[validate(custom(function = ...))]`. Rules spanning several fields
//! (date ranges, file uploads) run in [`FormValidate::validate_form`].

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::upload::UploadFile;

pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const DOCUMENT_MAX_BYTES: usize = 10 * 1024 * 1024;

pub const END_BEFORE_START_MESSAGE: &str = "End date/time cannot be before start date/time.";

pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("phone regex is valid"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(error(
            "password_length",
            "Password must be at least 8 characters",
        ));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(error(
            "password_complexity",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ))
    }
}

/// Exactly 11 digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(error("phone_format", "Phone number must be exactly 11 digits"))
    }
}

/// Exactly 11 digits, or empty
pub fn validate_optional_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        Ok(())
    } else {
        validate_phone(phone)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field is required"))
    } else {
        Ok(())
    }
}

/// Size ceiling and MIME allowlist for an upload field
#[derive(Debug, Clone, Copy)]
pub struct FileRule {
    pub max_bytes: usize,
    pub allowed_types: &'static [&'static str],
}

impl FileRule {
    pub const IMAGE: FileRule = FileRule {
        max_bytes: IMAGE_MAX_BYTES,
        allowed_types: &["image/jpeg", "image/png", "image/webp"],
    };

    pub const DOCUMENT: FileRule = FileRule {
        max_bytes: DOCUMENT_MAX_BYTES,
        allowed_types: &["application/pdf", "image/jpeg", "image/png"],
    };

    pub fn check(&self, file: &UploadFile) -> Result<(), ValidationError> {
        if file.size() > self.max_bytes {
            let mut err = ValidationError::new("file_too_large");
            err.message = Some(
                format!(
                    "File must be at most {} MB",
                    self.max_bytes / (1024 * 1024)
                )
                .into(),
            );
            err.add_param("size".into(), &file.size());
            return Err(err);
        }

        let content_type = file.content_type.to_ascii_lowercase();
        if !self.allowed_types.contains(&content_type.as_str()) {
            let mut err = ValidationError::new("file_type");
            err.message = Some(
                format!("File type must be one of: {}", self.allowed_types.join(", ")).into(),
            );
            return Err(err);
        }

        Ok(())
    }
}

/// Record a date range violation against the `end_date_time` field
pub fn check_date_range(errors: &mut ValidationErrors, start: NaiveDateTime, end: NaiveDateTime) {
    if end < start {
        errors.add("end_date_time", error("date_range", END_BEFORE_START_MESSAGE));
    }
}

/// Record a file rule violation against `field` when a file is present
pub fn check_file(
    errors: &mut ValidationErrors,
    field: &'static str,
    file: Option<&UploadFile>,
    rule: FileRule,
) {
    if let Some(file) = file {
        if let Err(err) = rule.check(file) {
            errors.add(field, err);
        }
    }
}

/// Record a "required" violation against `field` when the file is missing
pub fn check_required_file(errors: &mut ValidationErrors, field: &'static str, file: Option<&UploadFile>) {
    if file.is_none() {
        errors.add(field, error("required", "This file is required"));
    }
}

/// Full form validation: the derived field rules plus cross-field checks
pub trait FormValidate: Validate {
    fn cross_field(&self, _errors: &mut ValidationErrors) {}

    fn validate_form(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.cross_field(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Secret12").is_ok());
        assert!(validate_password("Abcdefg1234").is_ok());

        let short = validate_password("Sec12").unwrap_err();
        assert_eq!(short.code, "password_length");

        assert_eq!(validate_password("secret123").unwrap_err().code, "password_complexity");
        assert_eq!(validate_password("SECRET123").unwrap_err().code, "password_complexity");
        assert_eq!(validate_password("SecretPass").unwrap_err().code, "password_complexity");
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("09171234567").is_ok());
        assert!(validate_phone("0917123456").is_err());
        assert!(validate_phone("091712345678").is_err());
        assert!(validate_phone("0917-123-456").is_err());
        assert!(validate_phone("").is_err());

        assert!(validate_optional_phone("").is_ok());
        assert!(validate_optional_phone("09171234567").is_ok());
        assert!(validate_optional_phone("abc").is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(validate_phone("٠٩١٧١٢٣٤٥٦٧").is_err());
    }

    #[test]
    fn test_date_range() {
        let mut errors = ValidationErrors::new();
        check_date_range(&mut errors, at(10, 0), at(10, 0));
        assert!(errors.is_empty());

        check_date_range(&mut errors, at(10, 0), at(9, 0));
        let field = errors.field_errors();
        let errs = field.get("end_date_time").expect("end_date_time error");
        assert_eq!(
            errs[0].message.as_deref(),
            Some(END_BEFORE_START_MESSAGE)
        );
    }

    #[test]
    fn test_file_rules() {
        let ok = UploadFile::new("letter.pdf", "application/pdf", vec![0u8; 1024]);
        assert!(FileRule::DOCUMENT.check(&ok).is_ok());
        assert!(FileRule::IMAGE.check(&ok).is_err());

        let big = UploadFile::new("photo.png", "image/png", vec![0u8; IMAGE_MAX_BYTES + 1]);
        assert_eq!(FileRule::IMAGE.check(&big).unwrap_err().code, "file_too_large");
        assert!(FileRule::DOCUMENT.check(&big).is_ok());

        let exact = UploadFile::new("photo.PNG", "IMAGE/PNG", vec![0u8; IMAGE_MAX_BYTES]);
        assert!(FileRule::IMAGE.check(&exact).is_ok());

        let gif = UploadFile::new("anim.gif", "image/gif", vec![0u8; 10]);
        assert_eq!(FileRule::IMAGE.check(&gif).unwrap_err().code, "file_type");
    }
}
