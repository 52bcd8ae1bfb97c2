// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Topic status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ForumError;

/// Lifecycle status of a topic.
///
/// Every topic starts as `Unanswered`. After that the author may move it to
/// any of the four states, including back to `Unanswered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicStatus {
    /// Nobody has replied yet (initial state)
    #[default]
    Unanswered,
    /// Replies exist but none solved the problem
    Unsolved,
    /// The author marked the topic as solved
    Solved,
    /// Closed for further discussion
    Closed,
}

impl TopicStatus {
    /// All states, in lifecycle order.
    pub const ALL: [TopicStatus; 4] = [
        TopicStatus::Unanswered,
        TopicStatus::Unsolved,
        TopicStatus::Solved,
        TopicStatus::Closed,
    ];

    /// Canonical upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Unanswered => "UNANSWERED",
            TopicStatus::Unsolved => "UNSOLVED",
            TopicStatus::Solved => "SOLVED",
            TopicStatus::Closed => "CLOSED",
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Transitions are unrestricted; the only invariant is that both ends are
    /// one of the four named states, which the type already guarantees.
    pub fn can_transition_to(&self, _next: TopicStatus) -> bool {
        true
    }
}

impl FromStr for TopicStatus {
    type Err = ForumError;

    /// Parse a status tag, ignoring case.
    ///
    /// Accepts the English tags and the legacy Portuguese ones that older
    /// clients still send (`SOLUCIONADO`, `FECHADO`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNANSWERED" | "NAO_RESPONDIDO" => Ok(TopicStatus::Unanswered),
            "UNSOLVED" | "NAO_SOLUCIONADO" => Ok(TopicStatus::Unsolved),
            "SOLVED" | "SOLUCIONADO" => Ok(TopicStatus::Solved),
            "CLOSED" | "FECHADO" => Ok(TopicStatus::Closed),
            _ => Err(ForumError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
