//! Reads rendered telegrams back the way downstream harnesses do: by splitting on the fixed
//! separators rather than by any knowledge of the generator.
use crate::telegram::{MOBILE_PREFIX, STATIC_PREFIX, StreamKind, TIMESTAMP_FORMAT};
use anyhow::{Context, anyhow};
use chrono::NaiveDateTime;

const AT_SEPARATOR: &str = " at ";
const VOLUME_SEPARATOR: &str = " Volume:";
const STATUS_SEPARATOR: &str = " STATUS";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTelegram {
    pub kind: StreamKind,
    pub timestamp: NaiveDateTime,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Volume(f64),
    Status(String),
}

pub fn parse_telegram(line: &str) -> anyhow::Result<ParsedTelegram> {
    let (kind, payload_separator) = if line.starts_with(MOBILE_PREFIX) {
        (StreamKind::Mobile, VOLUME_SEPARATOR)
    } else if line.starts_with(STATIC_PREFIX) {
        (StreamKind::Static, STATUS_SEPARATOR)
    } else {
        return Err(anyhow!("unrecognised telegram: {line:?}"));
    };

    let (_, rest) = line
        .split_once(AT_SEPARATOR)
        .ok_or_else(|| anyhow!("telegram has no timestamp: {line:?}"))?;
    let (timestamp, payload) = rest
        .split_once(payload_separator)
        .ok_or_else(|| anyhow!("telegram has no payload: {line:?}"))?;

    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp in telegram: {line:?}"))?;

    let payload = match kind {
        StreamKind::Mobile => Payload::Volume(
            payload
                .trim()
                .parse()
                .with_context(|| format!("invalid volume in telegram: {line:?}"))?,
        ),
        StreamKind::Static => Payload::Status(
            payload
                .strip_prefix(':')
                .ok_or_else(|| anyhow!("telegram has no status: {line:?}"))?
                .trim()
                .to_owned(),
        ),
    };

    Ok(ParsedTelegram {
        kind,
        timestamp,
        payload,
    })
}
