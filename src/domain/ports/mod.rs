pub mod collector;
pub mod command;
pub mod history;
pub mod inference;
pub mod network;
pub mod notifier;

pub use collector::{CollectionError, SystemCollector};
pub use command::{CommandError, CommandOutput, CommandRunner};
pub use history::{HistoryError, HistoryStore};
pub use inference::{CompletionSample, InferenceEndpoint, ProbeError};
pub use network::{PortProbe, PortProbeError, PortState};
pub use notifier::{NotificationError, Notifier};
