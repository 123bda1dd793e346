use serde::{Deserialize, Serialize};

use crate::a11y::announcer::Politeness;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient toast shown after an action. Replaced by the next action's
/// outcome and dropped by any action that has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Live region a screen reader should hear this on.
    pub fn politeness(&self) -> Politeness {
        match self.level {
            NotificationLevel::Success | NotificationLevel::Info => Politeness::Polite,
            NotificationLevel::Warning | NotificationLevel::Error => Politeness::Assertive,
        }
    }
}
