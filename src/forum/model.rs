// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forum records as they are persisted, and the topic update rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ForumError, ForumResult, OwnedResource, TopicStatus};

/// Category assigned to courses created implicitly by a new topic.
pub const DEFAULT_COURSE_CATEGORY: &str = "Programming";

/// A registered forum user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique, immutable login (token subject)
    pub login: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never exposed via API
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A course that topics are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    /// Unique name, compared case-insensitively
    pub name: String,
    pub category: String,
}

impl Course {
    /// Course created on first reference by a topic.
    pub fn with_default_category(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_COURSE_CATEGORY.to_string(),
        }
    }
}

/// A discussion topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    /// Generated UUID, immutable
    pub id: String,
    pub title: String,
    pub body: String,
    /// Stamped once at creation
    pub created_at: DateTime<Utc>,
    pub status: TopicStatus,
    /// Login of the author, immutable
    pub author_login: String,
    /// Canonical name of the course
    pub course_name: String,
}

impl OwnedResource for Topic {
    const KIND: &'static str = "topic";

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn author_login(&self) -> &str {
        &self.author_login
    }
}

impl Topic {
    /// Create a new topic in the initial `UNANSWERED` state.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        author_login: impl Into<String>,
        course_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            created_at: now,
            status: TopicStatus::Unanswered,
            author_login: author_login.into(),
            course_name: course_name.into(),
        }
    }

    /// Apply a partial update and return the resulting topic.
    ///
    /// Blank or absent fields keep their current value. The status is parsed
    /// before anything is changed, so an invalid status leaves `self` intact
    /// and nothing of the patch is applied.
    pub fn apply(&self, patch: &TopicPatch) -> ForumResult<Topic> {
        let status = match non_blank(&patch.status) {
            Some(raw) => {
                let next: TopicStatus = raw.parse()?;
                if !self.status.can_transition_to(next) {
                    return Err(ForumError::InvalidStatus(raw.to_string()));
                }
                next
            }
            None => self.status,
        };

        let mut updated = self.clone();
        if let Some(title) = non_blank(&patch.title) {
            updated.title = title.to_string();
        }
        if let Some(body) = non_blank(&patch.body) {
            updated.body = body.to_string();
        }
        updated.status = status;
        Ok(updated)
    }
}

/// Partial update of a topic. `None` or blank means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Raw status tag, validated on apply
    pub status: Option<String>,
}

/// Input for topic creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub title: String,
    pub body: String,
    pub course_name: String,
}

impl NewTopic {
    pub fn validate(&self) -> ForumResult<()> {
        require_non_blank("title", &self.title)?;
        require_non_blank("body", &self.body)?;
        require_non_blank("course name", &self.course_name)
    }
}

/// Input for user registration. `password` is plaintext until hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUser {
    pub login: String,
    pub password: String,
    pub name: String,
    pub email: String,
}

impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

impl RegisterUser {
    pub fn validate(&self) -> ForumResult<()> {
        require_non_blank("login", &self.login)?;
        require_non_blank("password", &self.password)?;
        require_non_blank("name", &self.name)?;
        require_non_blank("email", &self.email)?;
        if !is_plausible_email(&self.email) {
            return Err(ForumError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn require_non_blank(field: &str, value: &str) -> ForumResult<()> {
    if value.trim().is_empty() {
        Err(ForumError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// `local@domain` with no whitespace and a non-empty part on each side.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_topic() -> Topic {
        Topic::new("Help", "stuck on loop", "alice", "CS101", Utc::now())
    }

    fn patch(title: Option<&str>, body: Option<&str>, status: Option<&str>) -> TopicPatch {
        TopicPatch {
            title: title.map(str::to_string),
            body: body.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn new_topic_starts_unanswered() {
        let topic = sample_topic();
        assert_eq!(topic.status, TopicStatus::Unanswered);
        assert!(!topic.id.is_empty());
        assert_eq!(topic.author_login, "alice");
    }

    #[test]
    fn blank_title_keeps_existing_title() {
        let topic = sample_topic();
        let updated = topic
            .apply(&patch(Some("   "), Some("new body"), None))
            .unwrap();

        assert_eq!(updated.title, "Help");
        assert_eq!(updated.body, "new body");
        assert_eq!(updated.status, TopicStatus::Unanswered);
    }

    #[test]
    fn invalid_status_applies_nothing() {
        let topic = sample_topic();
        let result = topic.apply(&patch(Some("New title"), Some("New body"), Some("bogus")));

        assert!(matches!(result, Err(ForumError::InvalidStatus(_))));
        assert_eq!(topic.title, "Help");
        assert_eq!(topic.body, "stuck on loop");
    }

    #[test]
    fn status_update_normalizes_case() {
        let topic = sample_topic();
        let updated = topic.apply(&patch(None, None, Some("solved"))).unwrap();
        assert_eq!(updated.status, TopicStatus::Solved);

        let reopened = updated.apply(&patch(None, None, Some("UNANSWERED"))).unwrap();
        assert_eq!(reopened.status, TopicStatus::Unanswered);
    }

    #[test]
    fn immutable_fields_survive_update() {
        let topic = sample_topic();
        let updated = topic
            .apply(&patch(Some("T"), Some("B"), Some("closed")))
            .unwrap();

        assert_eq!(updated.id, topic.id);
        assert_eq!(updated.created_at, topic.created_at);
        assert_eq!(updated.author_login, topic.author_login);
        assert_eq!(updated.course_name, topic.course_name);
    }

    #[test]
    fn blank_patch_leaves_topic_unchanged() {
        let topic = Topic::new("Help", "stuck on loop", "alice", "CS101", Utc::now());
        assert_eq!(topic.apply(&TopicPatch::default()).unwrap(), topic);
        assert_eq!(topic.apply(&patch(Some(""), Some(" "), None)).unwrap(), topic);
    }

    #[test]
    fn new_topic_validation_requires_all_fields() {
        let ok = NewTopic {
            title: "t".into(),
            body: "b".into(),
            course_name: "c".into(),
        };
        assert!(ok.validate().is_ok());

        let missing_course = NewTopic {
            course_name: " ".into(),
            ..ok
        };
        assert!(matches!(
            missing_course.validate(),
            Err(ForumError::Validation(_))
        ));
    }

    #[test]
    fn registration_validation_checks_email() {
        let mut user = RegisterUser {
            login: "alice".into(),
            password: "secret".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
        };
        assert!(user.validate().is_ok());

        user.email = "not-an-email".into();
        assert!(matches!(user.validate(), Err(ForumError::Validation(_))));

        user.email = "a@b@c".into();
        assert!(user.validate().is_err());
    }

    #[test]
    fn register_user_debug_hides_password() {
        let user = RegisterUser {
            login: "alice".into(),
            password: "hunter2".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
        };
        assert!(!format!("{user:?}").contains("hunter2"));
    }
}
