mod category;
mod dispatcher;
mod sink;

pub use category::{resolve_name, CooldownTable, FeedbackCategory, Resolution, Trigger};
pub use dispatcher::{FeedbackDispatcher, MUTED_KEY};
pub use sink::{FeedbackSink, SinkError};
