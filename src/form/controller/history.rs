use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::form::error::FieldError;

use super::{FieldController, FieldObserver};

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[ T]([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$",
    )
    .expect("date-time pattern")
});

impl FieldController {
    pub fn history_track_value(&self) -> Option<&str> {
        self.history_track_value.as_deref()
    }

    /// True when the field tracks history and the user has changed its value.
    pub fn accepts_history_track(&self) -> bool {
        self.config.history_track && self.has_change
    }

    /// Record when the current change took effect.
    ///
    /// Returns `Ok(false)` when the field does not track history or has no
    /// change to date.
    pub fn set_history_track(
        &mut self,
        value: &str,
        observer: &mut dyn FieldObserver,
    ) -> Result<bool, FieldError> {
        if !self.accepts_history_track() {
            return Ok(false);
        }
        let value = value.trim();
        if !DATE_TIME.is_match(value) {
            return Err(FieldError::InvalidHistoryTrack {
                field: self.config.id.clone(),
                value: value.to_string(),
            });
        }
        debug!(field = %self.config.id, value, "history track recorded");
        self.history_track_value = Some(value.to_string());
        observer.on_history_track_change(&self.config.id, value);
        Ok(true)
    }
}
