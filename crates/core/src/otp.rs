//! One-time passcode entry.
//!
//! A fixed number of single-digit slots bound to an expiry [`Countdown`]. The code is only
//! available once every slot is filled, and only accepted before the countdown reaches zero.

use crate::config::CoreConfig;
use crate::countdown::Countdown;
use crate::{DirectoryError, DirectoryResult};
use std::time::Duration;

#[derive(Debug)]
pub struct OtpEntry {
    slots: Vec<Option<char>>,
    expiry: Duration,
    countdown: Countdown,
}

impl OtpEntry {
    /// Create an empty entry and start its countdown. Must be called inside a tokio runtime.
    pub fn new(length: usize, expiry: Duration) -> DirectoryResult<Self> {
        if length == 0 {
            return Err(DirectoryError::InvalidInput(
                "otp length must be at least one digit".into(),
            ));
        }
        Ok(Self {
            slots: vec![None; length],
            expiry,
            countdown: Countdown::start(expiry),
        })
    }

    pub fn from_config(cfg: &CoreConfig) -> DirectoryResult<Self> {
        Self::new(cfg.otp_length(), cfg.otp_expiry())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Put `digit` in slot `index`. Returns the slot that should take focus next.
    pub fn set_digit(&mut self, index: usize, digit: char) -> DirectoryResult<usize> {
        if !digit.is_ascii_digit() {
            return Err(DirectoryError::InvalidInput(format!(
                "otp slots accept digits only, got {digit:?}"
            )));
        }
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            DirectoryError::InvalidInput(format!("otp slot {index} out of range 0..{len}"))
        })?;
        *slot = Some(digit);
        Ok((index + 1).min(len - 1))
    }

    /// Empty slot `index`. Returns the slot that should take focus next.
    pub fn clear_digit(&mut self, index: usize) -> usize {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
        index.saturating_sub(1)
    }

    /// Replace the whole entry with the digits in `text`, ignoring anything else. Slots past
    /// the pasted digits are left empty.
    ///
    /// # Returns
    /// How many slots were filled.
    pub fn paste(&mut self, text: &str) -> usize {
        let digits: Vec<char> = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.slots.len())
            .collect();
        self.slots.iter_mut().for_each(|s| *s = None);
        for (slot, digit) in self.slots.iter_mut().zip(&digits) {
            *slot = Some(*digit);
        }
        digits.len()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    pub fn is_expired(&self) -> bool {
        self.countdown.is_expired()
    }

    pub fn remaining_label(&self) -> String {
        self.countdown.remaining_label()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// The code to verify.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidInput`] if the code has expired or a slot is empty.
    pub fn submit(&self) -> DirectoryResult<String> {
        if self.is_expired() {
            return Err(DirectoryError::InvalidInput(
                "code expired; request a new one".into(),
            ));
        }
        self.code()
            .ok_or_else(|| DirectoryError::InvalidInput("code is incomplete".into()))
    }

    /// Clear every slot and restart the countdown. The previous countdown is cancelled.
    pub fn resend(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.countdown = Countdown::start(self.expiry);
        tracing::info!(expiry_secs = self.expiry.as_secs(), "otp resent");
    }
}
