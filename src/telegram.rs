//! Telegram records and their text rendering
//!
//! The rendered form is consumed by external harnesses that split on fixed substrings, so the
//! prefixes, the ` at ` separator and the `Volume:` / `STATUS:` keywords must not change.
use chrono::NaiveDateTime;
use std::fmt::{self, Display, Formatter};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MOBILE_PREFIX: &str = "Mobile telegram";
pub const STATIC_PREFIX: &str = "Static telegram";

/// Volumes below this threshold are rendered in exponent form.
const EXPONENT_THRESHOLD: f64 = 1e-4;

/// Which stream emitted a telegram. The derived ordering is the tie-break for equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamKind {
    Mobile,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Status {
    Ok,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobileReading {
    pub timestamp: NaiveDateTime,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticReading {
    pub timestamp: NaiveDateTime,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Telegram {
    Mobile(MobileReading),
    Static(StaticReading),
}

impl Telegram {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Mobile(_) => StreamKind::Mobile,
            Self::Static(_) => StreamKind::Static,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Mobile(reading) => reading.timestamp,
            Self::Static(reading) => reading.timestamp,
        }
    }

    /// Key used to merge both streams into one sequence.
    pub fn order_key(&self) -> (NaiveDateTime, StreamKind) {
        (self.timestamp(), self.kind())
    }
}

impl Display for Telegram {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobile(MobileReading { timestamp, volume }) => write!(
                f,
                "{MOBILE_PREFIX} sent at {} Volume: {}",
                timestamp.format(TIMESTAMP_FORMAT),
                VolumeDisplay(*volume)
            ),
            Self::Static(StaticReading { timestamp, status }) => write!(
                f,
                "{STATIC_PREFIX} sent at {} STATUS: {status}",
                timestamp.format(TIMESTAMP_FORMAT)
            ),
        }
    }
}

/// Renders volumes so that any standard float parser reads them back.
///
/// Tiny values such as the start sentinel use exponent form (`1e-6`); everything else uses the
/// shortest decimal that round-trips (`10.000001`).
struct VolumeDisplay(f64);

impl Display for VolumeDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let volume = self.0;
        if volume != 0.0 && volume.abs() < EXPONENT_THRESHOLD {
            write!(f, "{volume:e}")
        } else {
            write!(f, "{volume}")
        }
    }
}
