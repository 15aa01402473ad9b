use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use keepsake_core::Progress;
use serde_json::{json, Map, Value};

use crate::context::Context;

const UNLOCKED_PREFIX: &str = "progress.unlocked.";

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Record today's visit and print the streak
    Visit {
        /// Visit date (YYYY-MM-DD); defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Submit a score for a game
    Score {
        /// Game identifier (e.g. "memory-match")
        game: String,
        score: u64,
    },
    /// Unlock a note
    Unlock {
        /// Note identifier (e.g. "letter-3")
        note: String,
    },
    /// Print streak, high scores and unlocked notes as JSON
    Show {
        /// Include the high score of this game (repeatable)
        #[arg(long)]
        game: Vec<String>,
    },
}

pub fn run(ctx: &Context, action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let progress = Progress::new(&db);

    match action {
        ProgressAction::Visit { date } => {
            let day = date.unwrap_or_else(|| Utc::now().date_naive());
            let streak = progress.record_visit(day);
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
        ProgressAction::Score { game, score } => {
            let new_best = progress.submit_score(&game, score);
            let out = json!({
                "game": game,
                "score": score,
                "new_best": new_best,
                "high_score": progress.high_score(&game),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        ProgressAction::Unlock { note } => {
            progress.unlock(&note);
            println!("{}", json!({ "note": note, "unlocked": progress.is_unlocked(&note) }));
        }
        ProgressAction::Show { game } => {
            let scores: Map<String, Value> = game
                .iter()
                .map(|g| (g.clone(), json!(progress.high_score(g))))
                .collect();
            let unlocked: Vec<String> = db
                .kv_keys(UNLOCKED_PREFIX)?
                .into_iter()
                .filter_map(|key| key.strip_prefix(UNLOCKED_PREFIX).map(str::to_string))
                .filter(|note| progress.is_unlocked(note))
                .collect();
            let out = json!({
                "streak": progress.streak(),
                "high_scores": scores,
                "unlocked": unlocked,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
