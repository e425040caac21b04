use super::{EmissionStream, Schedule};
use crate::{
    config::StaticConfig,
    jitter::JitterGenerator,
    telegram::{StaticReading, Status, Telegram},
};
use chrono::NaiveDateTime;
use tracing::trace;

/// Hourly status stream. Only the nominal path exists, so every reading reports [Status::Ok].
#[derive(Debug, Clone)]
pub struct StaticStream {
    schedule: Schedule,
}

impl StaticStream {
    pub fn new(
        epoch: NaiveDateTime,
        end_secs: u64,
        cfg: &StaticConfig,
        jitter: JitterGenerator,
    ) -> Self {
        Self {
            schedule: Schedule::new(epoch, end_secs, cfg.interval.as_secs(), jitter),
        }
    }
}

impl EmissionStream for StaticStream {
    fn poll(&mut self, now_secs: u64, out: &mut Vec<Telegram>) {
        while let Some(timestamp) = self.schedule.next_due(now_secs) {
            trace!(%timestamp, "static reading");
            out.push(Telegram::Static(StaticReading {
                timestamp,
                status: Status::Ok,
            }));
        }
    }
}
