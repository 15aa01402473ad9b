use chrono::{DateTime, Utc};
use clap::Subcommand;
use keepsake_core::{
    breakdown, countdown, next_annual_occurrence, AnnualDate, Clock, Config, SystemClock,
};
use serde_json::json;
use std::error::Error;

use crate::context::{now_or_system, Context};

#[derive(Subcommand)]
pub enum TimeAction {
    /// Years, months, days and clock time since the start instant
    Together {
        /// Start instant (RFC 3339); defaults to together.started_at
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Evaluate at this instant instead of the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Next occurrence of the anniversary
    Anniversary {
        /// Month (1-12); defaults to anniversary.month
        #[arg(long, requires = "day")]
        month: Option<u32>,
        /// Day of month; defaults to anniversary.day
        #[arg(long, requires = "month")]
        day: Option<u32>,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Days, hours, minutes and seconds until an instant
    Countdown {
        /// Target instant (RFC 3339)
        #[arg(long)]
        target: DateTime<Utc>,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[arg(long)]
        json: bool,
    },
    /// Re-render time together and the anniversary countdown every second
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn start_from(config: &Config, start: Option<DateTime<Utc>>) -> Result<DateTime<Utc>, String> {
    start.or(config.together.started_at).ok_or_else(|| {
        "no start instant: pass --start or run `keepsake config set together.started_at <RFC 3339>`"
            .to_string()
    })
}

fn anniversary_line(config: &Config, now: DateTime<Utc>) -> Result<String, Box<dyn Error>> {
    let next = next_annual_occurrence(config.annual_date()?, now, config.leap_day_policy())?;
    if next.is_today {
        return Ok("today!".to_string());
    }
    Ok(match countdown(next.starts_at(), now) {
        Some(left) => format!("{left} (on {})", next.next_date),
        None => "today!".to_string(),
    })
}

/// One frame of the `watch` display. Fields that cannot be computed render
/// as a dash instead of aborting the loop.
fn render_frame(config: &Config, now: DateTime<Utc>) -> String {
    let together = match config.together.started_at.map(|start| breakdown(start, now)) {
        Some(Ok(b)) => b.to_string(),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "time together unavailable");
            "—".to_string()
        }
        None => "—".to_string(),
    };
    let anniversary = anniversary_line(config, now).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "anniversary unavailable");
        "—".to_string()
    });
    format!("together: {together} | anniversary: {anniversary}")
}

async fn watch(config: Config, clock: impl Clock, ticks: Option<u64>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    let mut rendered = 0u64;
    loop {
        interval.tick().await;
        println!("{}", render_frame(&config, clock.now()));
        rendered += 1;
        if ticks.is_some_and(|limit| rendered >= limit) {
            break;
        }
    }
}

pub fn run(ctx: &Context, action: TimeAction) -> Result<(), Box<dyn Error>> {
    match action {
        TimeAction::Together { start, now, json } => {
            let config = ctx.load_config()?;
            let start = start_from(&config, start)?;
            let b = breakdown(start, now_or_system(now))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&b)?);
            } else {
                println!("{b} ({} days)", b.total_days);
            }
        }
        TimeAction::Anniversary {
            month,
            day,
            now,
            json,
        } => {
            let config = ctx.load_config()?;
            let target = match (month, day) {
                (Some(m), Some(d)) => AnnualDate::new(m, d)?,
                _ => config.annual_date()?,
            };
            let now = now_or_system(now);
            let next = next_annual_occurrence(target, now, config.leap_day_policy())?;
            let left = countdown(next.starts_at(), now);
            if json {
                let out = json!({
                    "target": target,
                    "next_date": next.next_date,
                    "is_today": next.is_today,
                    "days_until": next.days_until,
                    "countdown": left,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if next.is_today {
                println!("{target} is today!");
            } else if let Some(left) = left {
                println!("{target}: {left} (on {})", next.next_date);
            }
        }
        TimeAction::Countdown { target, now, json } => {
            let left = countdown(target, now_or_system(now));
            if json {
                println!("{}", serde_json::to_string_pretty(&left)?);
            } else {
                match left {
                    Some(left) => println!("{left}"),
                    None => println!("arrived"),
                }
            }
        }
        TimeAction::Watch { ticks } => {
            let config = ctx.load_config()?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(watch(config, SystemClock, ticks));
        }
    }
    Ok(())
}
