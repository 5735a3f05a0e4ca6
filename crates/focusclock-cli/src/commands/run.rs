use std::error::Error;
use std::io::{IsTerminal, Write};
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use focusclock_core::storage::DriverConfig;
use focusclock_core::{
    ClockStatus, Config, Database, Event, ProductivityStats, ProductivityTracker, SessionClock,
    SessionType,
};
use serde::Serialize;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Args)]
pub struct RunArgs {
    /// Session to start with (work, short-break, long-break)
    #[arg(long, default_value = "work")]
    session: SessionType,
    /// Number of sessions to complete before exiting
    #[arg(long, default_value_t = 1)]
    sessions: u32,
}

#[derive(Serialize)]
struct RunSummary {
    completed_sessions: u32,
    next_session: SessionType,
    productivity_score: u8,
    stats: ProductivityStats,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let (mut tracker, _) = super::load_tracker(&db, &config)?;

    let mut clock = config.session_clock()?;
    clock.switch_session_type(args.session)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let completed = runtime.block_on(drive(
        &mut clock,
        &mut tracker,
        &db,
        &config.driver,
        args.sessions,
    ))?;

    let summary = RunSummary {
        completed_sessions: completed,
        next_session: match clock.status() {
            ClockStatus::Completed => clock.upcoming_session_type(),
            _ => clock.session_type(),
        },
        productivity_score: tracker.score(),
        stats: *tracker.stats(),
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

/// Feed the clock one tick per `tick_interval_ms` until `sessions` sessions
/// have completed, routing each completion into the tracker and the store.
///
/// Returns the number of sessions completed.
async fn drive(
    clock: &mut SessionClock,
    tracker: &mut ProductivityTracker,
    db: &Database,
    driver: &DriverConfig,
    sessions: u32,
) -> Result<u32, Box<dyn Error>> {
    if sessions == 0 {
        return Ok(0);
    }

    let period = Duration::from_millis(driver.tick_interval_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let render = std::io::stderr().is_terminal();

    let mut completed = 0;
    clock.start()?;
    tracing::info!(session_type = %clock.session_type(), "session started");

    loop {
        ticker.tick().await;
        let event = clock.tick()?;
        match event {
            Event::Progress {
                fraction_elapsed, ..
            } => {
                if render {
                    eprint!(
                        "\r{:<12} {} {:>3.0}%",
                        clock.session_type().label(),
                        clock.format_remaining(),
                        fraction_elapsed * 100.0
                    );
                    std::io::stderr().flush()?;
                }
            }
            Event::SessionCompleted {
                session_type,
                planned_duration_minutes,
            } => {
                if render {
                    eprintln!();
                }
                tracker.record_completion(session_type, i64::from(planned_duration_minutes))?;
                db.record_completion(tracker, session_type, planned_duration_minutes, Utc::now())?;
                println!("{}", serde_json::to_string(&event)?);

                completed += 1;
                if completed >= sessions || !driver.auto_advance {
                    return Ok(completed);
                }

                tokio::time::sleep(Duration::from_millis(driver.advance_delay_ms)).await;
                let next = clock.advance_after_completion()?;
                clock.start()?;
                ticker.reset();
                tracing::info!(session_type = %next, "session started");
            }
        }
    }
}
