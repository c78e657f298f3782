//! Constants used throughout the MDR core crate.

/// Title shown for a foreign key with no matching reference item.
pub const UNRESOLVED_TITLE: &str = "Unresolved";

/// Calendar format applied to `created_at` in display rows.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Separator between address segments.
pub const ADDRESS_SEPARATOR: &str = ", ";

/// Seconds before a one-time passcode expires.
pub const DEFAULT_OTP_EXPIRY_SECS: u64 = 60;

/// Number of digit slots in a one-time passcode.
pub const DEFAULT_OTP_LENGTH: usize = 6;

/// Transient notifications kept before the oldest is dropped.
pub const NOTIFICATION_CAPACITY: usize = 5;

/// Reference kind labels used in errors and logs.
pub const DOCTOR_KIND: &str = "doctor";
pub const SPECIALIZATION_KIND: &str = "specialization";
pub const AFFILIATION_KIND: &str = "affiliation";
