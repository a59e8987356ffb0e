pub mod composer_execution;
pub mod interaction;
pub mod outdated_parser;
pub mod update_orchestrator;

pub use composer_execution::ComposerClient;
pub use interaction::MajorUpgradePrompt;
pub use update_orchestrator::{UpdateAction, UpdateOrchestrator, UpdateOutcome, VersionRecord};
