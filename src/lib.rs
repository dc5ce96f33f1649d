pub mod config;
pub mod forms;
pub mod mailer;
pub mod server;
pub mod spam;
pub mod template;
pub mod validate;

pub use config::{Config, RuleSet};
pub use server::{build_router, AppState};
pub use spam::{SpamGuard, SpamReason, SpamVerdict, Submission};
