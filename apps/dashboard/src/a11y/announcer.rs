use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Default gap between clearing a live region and writing the new message.
pub const DEFAULT_ANNOUNCE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

/// An off-screen `aria-live` region.
///
/// Backed by a watch channel so every write is a change event for
/// subscribers, including a write of the same text as before.
#[derive(Clone)]
pub struct LiveRegion {
    politeness: Politeness,
    tx: Arc<watch::Sender<String>>,
}

impl LiveRegion {
    pub fn new(politeness: Politeness) -> Self {
        let (tx, _) = watch::channel(String::new());
        Self {
            politeness,
            tx: Arc::new(tx),
        }
    }

    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    pub fn text(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    fn write(&self, text: &str) {
        self.tx.send_replace(text.to_string());
    }
}

/// Writes messages into the polite or assertive live region.
///
/// Both regions are created once and shared by every clone.
#[derive(Clone)]
pub struct Announcer {
    polite: LiveRegion,
    assertive: LiveRegion,
    delay: Duration,
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOUNCE_DELAY)
    }
}

impl Announcer {
    pub fn new(delay: Duration) -> Self {
        Self {
            polite: LiveRegion::new(Politeness::Polite),
            assertive: LiveRegion::new(Politeness::Assertive),
            delay,
        }
    }

    pub fn region(&self, priority: Politeness) -> &LiveRegion {
        match priority {
            Politeness::Polite => &self.polite,
            Politeness::Assertive => &self.assertive,
        }
    }

    /// Clears the region, waits, then writes `message`. Assistive technology
    /// only reacts to a change, so repeating the same text still goes
    /// through the empty state first.
    pub async fn announce(&self, message: &str, priority: Politeness) {
        let region = self.region(priority);
        region.write("");
        tokio::time::sleep(self.delay).await;
        region.write(message);
        debug!("Announced ({}): {message}", priority.as_str());
    }

    /// Fire-and-forget variant for callers that must not wait on the delay.
    pub fn spawn_announce(&self, message: String, priority: Politeness) {
        let announcer = self.clone();
        tokio::spawn(async move {
            announcer.announce(&message, priority).await;
        });
    }
}
