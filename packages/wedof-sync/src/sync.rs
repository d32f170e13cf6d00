//! Sync service: fetch every collection, mirror it to sheets, and repeat daily.

use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};

use crate::aggregate::Aggregate;
use crate::client::WedofClient;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::http::{ReqwestTransport, Transport};
use crate::writer::{mirror_aggregate, DirectorySheetWriter, MirrorReport, SheetWriter};

/// How often the scheduler checks whether a run is due.
pub const SCHEDULER_TICK: Duration = Duration::from_secs(60);

/// Next occurrence of `at` strictly after `now`.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use wedof_sync::sync::next_run_after;
///
/// let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let morning = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// assert_eq!(next_run_after(morning, at).to_string(), "2025-03-01 09:00:00");
/// ```
#[must_use]
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// A job that is due once a day at a fixed local time.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    at: NaiveTime,
    next: NaiveDateTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next: next_run_after(now, at),
        }
    }

    #[must_use]
    pub fn next_run(&self) -> NaiveDateTime {
        self.next
    }

    /// Whether a run is due at `now`. A due run is consumed and the next one
    /// is planned for the following occurrence of the daily time.
    pub fn take_due(&mut self, now: NaiveDateTime) -> bool {
        if now < self.next {
            return false;
        }
        self.next = next_run_after(now, self.at);
        true
    }
}

/// Outcome of one sync cycle.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// `(endpoint, records)` in fetch order.
    pub counts: Vec<(&'static str, usize)>,
    /// `(endpoint, error)` of each endpoint that could not be fetched.
    pub fetch_failures: Vec<(&'static str, String)>,
    pub mirror: MirrorReport,
    pub location: String,
}

impl SyncReport {
    fn new(aggregate: &Aggregate, mirror: MirrorReport, location: String) -> Self {
        Self {
            counts: aggregate
                .collections()
                .iter()
                .map(|c| (c.name(), c.records.len()))
                .collect(),
            fetch_failures: aggregate
                .failures()
                .map(|c| (c.name(), c.error.clone().unwrap_or_default()))
                .collect(),
            mirror,
            location,
        }
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// True when every endpoint was fetched and every sheet written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fetch_failures.is_empty() && self.mirror.failed.is_empty()
    }
}

/// Wedof → sheets synchronization.
pub struct SyncService<T = ReqwestTransport, W = DirectorySheetWriter> {
    client: WedofClient<T>,
    writer: W,
    sync_time: NaiveTime,
}

impl SyncService<ReqwestTransport, DirectorySheetWriter> {
    /// Build the production service: network client and directory writer.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let client = WedofClient::new(&config.client)?;
        let writer = DirectorySheetWriter::new(&config.output_dir);
        tracing::info!(output = %config.output_dir.display(), "sync service initialised");
        Ok(Self::new(client, writer, config.sync_time))
    }
}

impl<T: Transport, W: SheetWriter> SyncService<T, W> {
    pub fn new(client: WedofClient<T>, writer: W, sync_time: NaiveTime) -> Self {
        Self {
            client,
            writer,
            sync_time,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Run one full cycle: fetch every collection, then mirror it.
    pub fn run_once(&self) -> SyncReport {
        tracing::info!(started_at = %Local::now().to_rfc3339(), "sync started");

        let aggregate = self.client.fetch_all();
        tracing::info!(total = aggregate.total_records(), "records fetched");

        let mirror = mirror_aggregate(&self.writer, &aggregate);
        let report = SyncReport::new(&aggregate, mirror, self.writer.location());

        if report.is_complete() {
            tracing::info!(location = %report.location, "sync finished");
        } else {
            tracing::warn!(
                location = %report.location,
                fetch_failures = report.fetch_failures.len(),
                sheet_failures = report.mirror.failed.len(),
                "sync finished with failures"
            );
        }
        report
    }

    /// Check both ends: drain the users endpoint, then check the sheet
    /// destination.
    ///
    /// Returns the number of users found.
    pub fn test_connection(&self) -> Result<usize> {
        let users = self.client.get_users()?;
        tracing::info!(users = users.len(), "Wedof connection OK");

        self.writer.check()?;
        tracing::info!(location = %self.writer.location(), "sheet destination OK");
        Ok(users.len())
    }

    /// Sync now, then once a day at the configured time. Never returns.
    pub fn run_scheduler(&self) -> ! {
        tracing::info!(at = %self.sync_time.format("%H:%M"), "daily scheduler started");

        self.run_once();

        let mut schedule = DailySchedule::new(self.sync_time, Local::now().naive_local());
        loop {
            tracing::debug!(next_run = %schedule.next_run(), "waiting for next run");
            thread::sleep(SCHEDULER_TICK);
            if schedule.take_due(Local::now().naive_local()) {
                self.run_once();
            }
        }
    }
}
