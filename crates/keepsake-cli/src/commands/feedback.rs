use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use keepsake_core::feedback::resolve_name;
use keepsake_core::{
    FeedbackCategory, FeedbackDispatcher, FeedbackSink, MemoryStore, SinkError, Trigger,
};
use serde_json::{json, Value};
use std::io::Write;

use crate::context::{now_or_system, Context};

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Ask whether a trigger may fire now
    Emit {
        /// Trigger name (e.g. "button-tap") or category name (e.g. "success")
        trigger: String,
        /// Evaluate at this instant instead of the system clock (RFC 3339)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Ring the terminal bell when emission is allowed
        #[arg(long)]
        bell: bool,
    },
    /// Replay `name@offset_ms` events against a fresh dispatcher
    Simulate {
        /// Events such as "tap@0 tap@50 tap@130"
        #[arg(required = true)]
        events: Vec<String>,
        /// Instant that offsets count from (RFC 3339); defaults to the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Mute all feedback (persisted)
    Mute,
    /// Unmute feedback (persisted)
    Unmute,
    /// Print mute flag and cooldown table as JSON
    Status,
    /// List registered triggers and their categories
    Triggers,
}

/// Rings the terminal bell on stderr.
struct TerminalBell;

impl FeedbackSink for TerminalBell {
    fn emit(&mut self, _category: FeedbackCategory) -> Result<(), SinkError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| SinkError::DeviceUnavailable(e.to_string()))
    }
}

fn parse_event(event: &str) -> Result<(&str, i64), String> {
    let (name, offset) = event
        .rsplit_once('@')
        .ok_or_else(|| format!("expected name@offset_ms, got '{event}'"))?;
    let offset = offset
        .parse::<i64>()
        .map_err(|_| format!("invalid offset in '{event}'"))?;
    Ok((name, offset))
}

/// Replay `events` against `dispatcher`, offsets counted from `base`.
fn simulate(
    mut dispatcher: FeedbackDispatcher<MemoryStore>,
    base: DateTime<Utc>,
    events: &[String],
) -> Result<Vec<Value>, String> {
    events
        .iter()
        .map(|event| {
            let (name, offset_ms) = parse_event(event)?;
            let at = base + Duration::milliseconds(offset_ms);
            let (category, _) = resolve_name(name);
            let emitted = dispatcher.try_emit_named(name, at);
            Ok(json!({
                "trigger": name,
                "at_ms": offset_ms,
                "at": at,
                "category": category,
                "emitted": emitted,
            }))
        })
        .collect()
}

fn set_muted(ctx: &Context, muted: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let mut dispatcher = FeedbackDispatcher::new(&db);
    dispatcher.set_muted(muted);
    println!("{}", json!({ "muted": dispatcher.is_muted() }));
    Ok(())
}

pub fn run(ctx: &Context, action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FeedbackAction::Emit { trigger, now, bell } => {
            let config = ctx.load_config()?;
            let db = ctx.open_db()?;
            let mut dispatcher = FeedbackDispatcher::with_cooldowns(&db, config.cooldown_table());
            let (category, resolution) = resolve_name(&trigger);
            let emitted = dispatcher.try_emit_named(&trigger, now_or_system(now));
            if emitted && bell {
                if let Err(e) = TerminalBell.emit(category) {
                    tracing::warn!(error = %e, "bell failed");
                }
            }
            let out = json!({
                "trigger": trigger,
                "category": category,
                "resolution": resolution,
                "emitted": emitted,
                "muted": dispatcher.is_muted(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        FeedbackAction::Simulate { events, now } => {
            let config = ctx.load_config()?;
            let dispatcher =
                FeedbackDispatcher::with_cooldowns(MemoryStore::new(), config.cooldown_table());
            for line in simulate(dispatcher, now_or_system(now), &events)? {
                println!("{line}");
            }
        }
        FeedbackAction::Mute => set_muted(ctx, true)?,
        FeedbackAction::Unmute => set_muted(ctx, false)?,
        FeedbackAction::Status => {
            let config = ctx.load_config()?;
            let db = ctx.open_db()?;
            let dispatcher = FeedbackDispatcher::with_cooldowns(&db, config.cooldown_table());
            let out = json!({
                "muted": dispatcher.is_muted(),
                "cooldowns_ms": dispatcher.cooldowns(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        FeedbackAction::Triggers => {
            for trigger in Trigger::ALL {
                println!("{:<16} {}", trigger.name(), trigger.category());
            }
        }
    }
    Ok(())
}
