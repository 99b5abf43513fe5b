use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::alert::Alert;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Channel that receives `watch` alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one alert.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the channel rejects or cannot be reached.
    async fn notify(&self, alert: &Alert) -> Result<(), NotificationError>;
}
