//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_DATE_FORMAT, DEFAULT_OTP_EXPIRY_SECS, DEFAULT_OTP_LENGTH};
use crate::{DirectoryError, DirectoryResult, NonEmptyText};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    seed_file: Option<PathBuf>,
    date_format: String,
    otp_expiry: Duration,
    otp_length: usize,
}

impl CoreConfig {
    pub fn new(
        seed_file: Option<PathBuf>,
        date_format: NonEmptyText,
        otp_expiry: Duration,
        otp_length: usize,
    ) -> DirectoryResult<Self> {
        if otp_expiry.is_zero() {
            return Err(DirectoryError::InvalidInput(
                "otp_expiry must be at least one second".into(),
            ));
        }
        if otp_length == 0 {
            return Err(DirectoryError::InvalidInput(
                "otp_length must be at least one digit".into(),
            ));
        }

        Ok(Self {
            seed_file,
            date_format: date_format.into_inner(),
            otp_expiry,
            otp_length,
        })
    }

    pub fn seed_file(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn otp_expiry(&self) -> Duration {
        self.otp_expiry
    }

    pub fn otp_length(&self) -> usize {
        self.otp_length
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            otp_expiry: Duration::from_secs(DEFAULT_OTP_EXPIRY_SECS),
            otp_length: DEFAULT_OTP_LENGTH,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a [`CoreConfig`] from optional raw values, typically read from the environment at
/// startup. Missing or blank values fall back to the defaults.
pub fn config_from_env_values(
    seed_file: Option<String>,
    date_format: Option<String>,
    otp_expiry_secs: Option<String>,
    otp_length: Option<String>,
) -> DirectoryResult<CoreConfig> {
    let defaults = CoreConfig::default();

    let seed_file = non_blank(seed_file).map(PathBuf::from);
    if let Some(path) = &seed_file {
        if !path.is_file() {
            return Err(DirectoryError::InvalidInput(format!(
                "seed file does not exist: {}",
                path.display()
            )));
        }
    }

    let date_format = match non_blank(date_format) {
        Some(v) => NonEmptyText::new(v)
            .map_err(|e| DirectoryError::InvalidInput(format!("date format: {e}")))?,
        None => NonEmptyText::new(&defaults.date_format)
            .map_err(|e| DirectoryError::InvalidInput(format!("date format: {e}")))?,
    };

    let otp_expiry = match non_blank(otp_expiry_secs) {
        Some(v) => Duration::from_secs(v.parse::<u64>().map_err(|_| {
            DirectoryError::InvalidInput(format!("otp expiry is not a whole number: {v}"))
        })?),
        None => defaults.otp_expiry,
    };

    let otp_length = match non_blank(otp_length) {
        Some(v) => v.parse::<usize>().map_err(|_| {
            DirectoryError::InvalidInput(format!("otp length is not a whole number: {v}"))
        })?,
        None => defaults.otp_length,
    };

    CoreConfig::new(seed_file, date_format, otp_expiry, otp_length)
}
