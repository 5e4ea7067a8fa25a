use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
}

impl ServerStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityState {
    pub status: ServerStatus,
    pub last_checked: DateTime<Utc>,
}

impl AvailabilityState {
    /// Optimistic default used until the first real check completes.
    pub fn optimistic() -> Self {
        Self {
            status: ServerStatus::Online,
            last_checked: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: ServerStatus,
    pub to: ServerStatus,
    pub at: DateTime<Utc>,
}
