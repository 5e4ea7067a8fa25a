use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::ScheduleConfig;
use crate::i18n::Text;
use super::monitor::AvailabilityMonitor;

/// Receives the twice-daily reminders. Implementations absorb their own errors.
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn remind(&self, title: Text);
}

/// Wall-clock trigger, always evaluated in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Minutes of the hour divisible by `n`, at second zero.
    EveryMinutes(u32),
    /// Once a day at `hour:00:00`.
    DailyAt { hour: u32 },
}

impl Cadence {
    /// First fire time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Cadence::EveryMinutes(n) => {
                let n = n.clamp(1, 60);
                let minute_start = now
                    - ChronoDuration::seconds(now.second() as i64)
                    - ChronoDuration::nanoseconds(now.nanosecond() as i64);
                let minute = minute_start.minute();
                let next = (minute / n + 1) * n;
                let step = if next < 60 { next - minute } else { 60 - minute };
                minute_start + ChronoDuration::minutes(step as i64)
            }
            Cadence::DailyAt { hour } => {
                let day_start = now
                    - ChronoDuration::seconds(now.num_seconds_from_midnight() as i64)
                    - ChronoDuration::nanoseconds(now.nanosecond() as i64);
                let today = day_start + ChronoDuration::hours((hour % 24) as i64);
                if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                }
            }
        }
    }
}

/// Spawns a task running `job` at every fire time of `cadence`.
/// A run finishes before the next fire time is computed.
pub fn spawn_job<F, Fut>(name: &'static str, cadence: Cadence, job: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut last_fire: Option<DateTime<Utc>> = None;
        loop {
            let now = Utc::now();
            // Never fire the same slot twice if the wall clock lags the timer
            let from = last_fire.map_or(now, |last| last.max(now));
            let next = cadence.next_after(from);
            tracing::debug!("⏰ {} next run at {}", name, next);

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            tracing::info!("⏰ Running {}", name);
            job().await;
            last_fire = Some(next);
        }
    })
}

/// Every reminder reports on a freshly checked server.
pub async fn run_reminder(monitor: &AvailabilityMonitor, reminders: &dyn ReminderSink, title: Text) {
    monitor.check().await;
    reminders.remind(title).await;
}

/// Runs the startup check, then arms the status check and both reminders.
/// The returned handle completes once every job is armed.
pub fn start(
    monitor: Arc<AvailabilityMonitor>,
    reminders: Arc<dyn ReminderSink>,
    config: &ScheduleConfig,
) -> JoinHandle<()> {
    let config = config.clone();

    tokio::spawn(async move {
        let online = monitor.check().await;
        tracing::info!("🔍 Initial server check: {}", if online { "online" } else { "offline" });

        let m = monitor.clone();
        spawn_job("status-check", Cadence::EveryMinutes(config.status_interval_minutes), move || {
            let m = m.clone();
            async move {
                m.check().await;
            }
        });

        let reminder_jobs = [
            ("morning-reminder", config.morning_hour, Text::MorningReminder),
            ("evening-reminder", config.evening_hour, Text::EveningReminder),
        ];
        for (name, hour, title) in reminder_jobs {
            let m = monitor.clone();
            let r = reminders.clone();
            spawn_job(name, Cadence::DailyAt { hour }, move || {
                let m = m.clone();
                let r = r.clone();
                async move {
                    run_reminder(&m, r.as_ref(), title).await;
                }
            });
        }

        tracing::info!(
            "⏰ Reminders scheduled at {:02}:00 and {:02}:00 UTC, status check every {} minutes",
            config.morning_hour,
            config.evening_hour,
            config.status_interval_minutes
        );
    })
}
