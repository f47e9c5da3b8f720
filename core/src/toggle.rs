//! Client-side favorite toggling.
//!
//! Tracks a per-tool state (`Idle`, `Pending`, `Favorited`, `Error`) on top of a
//! local mirror of the server's favorite set. The mirror is only changed when
//! the server confirms a mutation.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::catalog::ToolId;

/// How long a notice stays visible before it clears itself.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    Idle,
    Pending(ToggleAction),
    Favorited,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Conflict,
    NotFound,
    Failure,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= NOTICE_TTL
    }
}

/// Why a favorite request did not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// 409 from the server, with its message when one was sent
    Conflict(Option<String>),
    /// 404 from the server, with its message when one was sent
    NotFound(Option<String>),
    /// Timeouts, connection failures, 5xx and anything unexpected
    Other,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("a request for tool {0} is already in flight")]
    Busy(ToolId),
    #[error("{0}")]
    AlreadyFavorited(String),
    #[error("tool {0} is not in your favorites")]
    NotFavorited(ToolId),
    #[error("no request for tool {0} is in flight")]
    NotPending(ToolId),
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Pending(ToggleAction),
    Failed { until: Instant },
}

#[derive(Debug, Default)]
pub struct FavoriteToggles {
    mirror: HashSet<ToolId>,
    entries: HashMap<ToolId, Entry>,
    notice: Option<Notice>,
}

impl FavoriteToggles {
    pub fn with_mirror(ids: impl IntoIterator<Item = ToolId>) -> Self {
        Self {
            mirror: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_favorite(&self, id: ToolId) -> bool {
        self.mirror.contains(&id)
    }

    pub fn favorite_count(&self) -> usize {
        self.mirror.len()
    }

    pub fn state(&self, id: ToolId) -> ToggleState {
        match self.entries.get(&id) {
            Some(Entry::Pending(action)) => ToggleState::Pending(*action),
            Some(Entry::Failed { .. }) => ToggleState::Error,
            None if self.mirror.contains(&id) => ToggleState::Favorited,
            None => ToggleState::Idle,
        }
    }

    /// The current notice, if it has not expired at `now`.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    /// Start an add. Refused while a request for `id` is outstanding, and
    /// refused locally (with a conflict notice) when the mirror already
    /// holds `id`.
    pub fn begin_add(&mut self, id: ToolId, name: &str, now: Instant) -> Result<(), ToggleError> {
        self.ensure_not_pending(id)?;
        if self.mirror.contains(&id) {
            let message = format!("{name} is already in your favorites!");
            self.raise(NoticeKind::Conflict, message.clone(), now);
            return Err(ToggleError::AlreadyFavorited(message));
        }
        self.notice = None;
        self.entries.insert(id, Entry::Pending(ToggleAction::Add));
        Ok(())
    }

    pub fn complete_add(
        &mut self,
        id: ToolId,
        outcome: Result<(), RequestFailure>,
        now: Instant,
    ) -> Result<ToggleState, ToggleError> {
        self.take_pending(id, ToggleAction::Add)?;
        match outcome {
            Ok(()) => {
                self.mirror.insert(id);
            }
            Err(failure) => {
                let (kind, message) = match failure {
                    RequestFailure::Conflict(message) => (
                        NoticeKind::Conflict,
                        message.unwrap_or_else(|| {
                            "This tool is already in your favorites!".to_string()
                        }),
                    ),
                    RequestFailure::NotFound(message) => (
                        NoticeKind::NotFound,
                        message.unwrap_or_else(|| "Tool not found".to_string()),
                    ),
                    RequestFailure::Other => (
                        NoticeKind::Failure,
                        "Failed to add to favorites. Please try again.".to_string(),
                    ),
                };
                self.fail(id, kind, message, now);
            }
        }
        Ok(self.state(id))
    }

    pub fn begin_remove(&mut self, id: ToolId) -> Result<(), ToggleError> {
        self.ensure_not_pending(id)?;
        if !self.mirror.contains(&id) {
            return Err(ToggleError::NotFavorited(id));
        }
        self.notice = None;
        self.entries.insert(id, Entry::Pending(ToggleAction::Remove));
        Ok(())
    }

    pub fn complete_remove(
        &mut self,
        id: ToolId,
        outcome: Result<(), RequestFailure>,
        now: Instant,
    ) -> Result<ToggleState, ToggleError> {
        self.take_pending(id, ToggleAction::Remove)?;
        match outcome {
            Ok(()) => {
                self.mirror.remove(&id);
            }
            Err(RequestFailure::NotFound(message)) => {
                let message =
                    message.unwrap_or_else(|| "Tool not found in favorites".to_string());
                self.fail(id, NoticeKind::NotFound, message, now);
            }
            Err(_) => self.fail(
                id,
                NoticeKind::Failure,
                "Failed to remove from favorites. Please try again.".to_string(),
                now,
            ),
        }
        Ok(self.state(id))
    }

    /// Clear an expired notice and settle tools whose error has timed out.
    /// A failed add settles back to `Idle`, a failed remove to `Favorited`,
    /// since neither mutation applied.
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
        self.entries.retain(|_, entry| match entry {
            Entry::Failed { until } => now < *until,
            Entry::Pending(_) => true,
        });
    }

    fn ensure_not_pending(&self, id: ToolId) -> Result<(), ToggleError> {
        match self.entries.get(&id) {
            Some(Entry::Pending(_)) => Err(ToggleError::Busy(id)),
            _ => Ok(()),
        }
    }

    fn take_pending(&mut self, id: ToolId, action: ToggleAction) -> Result<(), ToggleError> {
        match self.entries.get(&id) {
            Some(Entry::Pending(pending)) if *pending == action => {
                self.entries.remove(&id);
                Ok(())
            }
            _ => Err(ToggleError::NotPending(id)),
        }
    }

    fn fail(&mut self, id: ToolId, kind: NoticeKind, message: String, now: Instant) {
        self.entries.insert(
            id,
            Entry::Failed {
                until: now + NOTICE_TTL,
            },
        );
        self.raise(kind, message, now);
    }

    fn raise(&mut self, kind: NoticeKind, message: String, now: Instant) {
        self.notice = Some(Notice {
            kind,
            message,
            raised_at: now,
        });
    }
}
