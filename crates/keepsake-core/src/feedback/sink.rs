//! Playback boundary.
//!
//! The dispatcher only grants permission; whatever actually plays a sound or
//! buzzes the device sits behind [`FeedbackSink`].

use thiserror::Error;

use super::FeedbackCategory;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Output device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

pub trait FeedbackSink {
    fn emit(&mut self, category: FeedbackCategory) -> Result<(), SinkError>;
}

impl<F> FeedbackSink for F
where
    F: FnMut(FeedbackCategory) -> Result<(), SinkError>,
{
    fn emit(&mut self, category: FeedbackCategory) -> Result<(), SinkError> {
        self(category)
    }
}
