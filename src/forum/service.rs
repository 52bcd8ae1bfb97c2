// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forum operations over the store.
//!
//! Each mutating operation runs inside a single write transaction: lookups,
//! ownership checks, lifecycle rules and the final write either all take
//! effect or none do.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::{
    Course, ForumError, ForumResult, NewTopic, OwnershipCheck, RegisterUser, Topic, TopicPatch,
    User,
};
use crate::auth::{hash_password, verify_password};
use crate::storage::ForumDatabase;

/// Registration, authentication and topic management.
#[derive(Clone)]
pub struct ForumService {
    db: Arc<ForumDatabase>,
}

impl ForumService {
    pub fn new(db: Arc<ForumDatabase>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &ForumDatabase {
        &self.db
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new user with a hashed password.
    pub fn register(&self, request: RegisterUser) -> ForumResult<User> {
        request.validate()?;

        let password_hash = hash_password(&request.password)
            .map_err(|e| ForumError::PasswordHash(e.to_string()))?;

        let user = User {
            login: request.login,
            name: request.name,
            email: request.email,
            password_hash,
            created_at: Utc::now(),
        };

        self.db.write(|session| -> ForumResult<()> {
            if session.user_exists(&user.login)? {
                warn!(login = %user.login, "Registration rejected: login already in use");
                return Err(ForumError::DuplicateLogin(user.login.clone()));
            }
            session.save_user(&user)?;
            Ok(())
        })?;

        info!(login = %user.login, "User registered");
        Ok(user)
    }

    /// Check a login/password pair.
    ///
    /// Unknown logins and wrong passwords both yield `InvalidCredentials`.
    pub fn authenticate(&self, login: &str, password: &str) -> ForumResult<User> {
        let user = self.db.find_user_by_login(login)?;
        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                info!(login = %login, "User authenticated");
                Ok(user)
            }
            _ => {
                warn!(login = %login, "Authentication failed");
                Err(ForumError::InvalidCredentials)
            }
        }
    }

    pub fn find_user(&self, login: &str) -> ForumResult<User> {
        self.db
            .find_user_by_login(login)?
            .ok_or_else(|| ForumError::not_found("user", login))
    }

    // =========================================================================
    // Topics
    // =========================================================================

    /// Create a topic authored by `author_login`.
    ///
    /// The course is looked up ignoring case and created on first use.
    pub fn create_topic(&self, request: NewTopic, author_login: &str) -> ForumResult<Topic> {
        request.validate()?;

        let topic = self.db.write(|session| -> ForumResult<Topic> {
            if session.topic_exists_with_content(&request.title, &request.body)? {
                warn!(author = %author_login, "Topic rejected: duplicate title and body");
                return Err(ForumError::DuplicateTopic);
            }

            let author = session
                .find_user_by_login(author_login)?
                .ok_or_else(|| ForumError::not_found("user", author_login))?;

            let course = match session.find_course_by_name_ignore_case(&request.course_name)? {
                Some(course) => course,
                None => {
                    let course = Course::with_default_category(request.course_name.as_str());
                    session.save_course(&course)?;
                    info!(course = %course.name, "Course created");
                    course
                }
            };

            let topic = Topic::new(
                request.title.as_str(),
                request.body.as_str(),
                author.login,
                course.name,
                Utc::now(),
            );
            session.save_topic(&topic)?;
            Ok(topic)
        })?;

        info!(topic_id = %topic.id, author = %topic.author_login, "Topic created");
        Ok(topic)
    }

    /// All topics, oldest first.
    pub fn list_topics(&self) -> ForumResult<Vec<Topic>> {
        Ok(self.db.list_topics()?)
    }

    pub fn get_topic(&self, id: &str) -> ForumResult<Topic> {
        self.db
            .find_topic(id)?
            .ok_or_else(|| ForumError::not_found("topic", id))
    }

    /// Apply `patch` to topic `id` on behalf of `requester_login`.
    ///
    /// Order of checks: the topic must exist, the requester must be its
    /// author, then the patch must be valid. Any failure leaves the stored
    /// topic unchanged.
    pub fn update_topic(
        &self,
        id: &str,
        patch: &TopicPatch,
        requester_login: &str,
    ) -> ForumResult<Topic> {
        let result = self.db.write(|session| -> ForumResult<Topic> {
            let topic = session.find_topic(id)?.verify_owner(id, requester_login)?;
            let updated = topic.apply(patch)?;
            session.save_topic(&updated)?;
            Ok(updated)
        });

        match &result {
            Ok(topic) => info!(topic_id = %id, status = %topic.status, "Topic updated"),
            Err(e) => warn!(topic_id = %id, requester = %requester_login, error = %e, "Topic update rejected"),
        }
        result
    }

    /// Delete topic `id` on behalf of `requester_login`.
    pub fn delete_topic(&self, id: &str, requester_login: &str) -> ForumResult<()> {
        let result = self.db.write(|session| -> ForumResult<()> {
            let topic = session.find_topic(id)?.verify_owner(id, requester_login)?;
            session.delete_topic(&topic)?;
            Ok(())
        });

        match &result {
            Ok(()) => info!(topic_id = %id, "Topic deleted"),
            Err(e) => warn!(topic_id = %id, requester = %requester_login, error = %e, "Topic deletion rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::TopicStatus;

    fn test_service() -> (ForumService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = ForumDatabase::open(&dir.path().join("forum.redb")).unwrap();
        (ForumService::new(Arc::new(db)), dir)
    }

    fn register(service: &ForumService, login: &str) -> User {
        service
            .register(RegisterUser {
                login: login.to_string(),
                password: format!("{login}-password"),
                name: login.to_uppercase(),
                email: format!("{login}@example.com"),
            })
            .unwrap()
    }

    fn new_topic(title: &str, body: &str, course: &str) -> NewTopic {
        NewTopic {
            title: title.to_string(),
            body: body.to_string(),
            course_name: course.to_string(),
        }
    }

    fn patch(title: Option<&str>, body: Option<&str>, status: Option<&str>) -> TopicPatch {
        TopicPatch {
            title: title.map(str::to_string),
            body: body.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    fn setup_with_topic() -> (ForumService, tempfile::TempDir, Topic) {
        let (service, dir) = test_service();
        register(&service, "alice");
        register(&service, "bob");
        let topic = service
            .create_topic(new_topic("Help", "stuck on loop", "CS101"), "alice")
            .unwrap();
        (service, dir, topic)
    }

    #[test]
    fn register_hashes_password_and_rejects_duplicates() {
        let (service, _dir) = test_service();
        let user = register(&service, "alice");
        assert_ne!(user.password_hash, "alice-password");

        let again = service.register(RegisterUser {
            login: "alice".to_string(),
            password: "other".to_string(),
            name: "Other".to_string(),
            email: "other@example.com".to_string(),
        });
        assert!(matches!(again, Err(ForumError::DuplicateLogin(login)) if login == "alice"));

        // Stored record is untouched
        let stored = service.find_user("alice").unwrap();
        assert_eq!(stored.email, "alice@example.com");
    }

    #[test]
    fn authenticate_checks_password() {
        let (service, _dir) = test_service();
        register(&service, "alice");

        assert_eq!(
            service.authenticate("alice", "alice-password").unwrap().login,
            "alice"
        );
        assert!(matches!(
            service.authenticate("alice", "wrong"),
            Err(ForumError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate("nobody", "alice-password"),
            Err(ForumError::InvalidCredentials)
        ));
    }

    #[test]
    fn create_topic_starts_unanswered_and_creates_course() {
        let (service, _dir, topic) = setup_with_topic();

        assert_eq!(topic.status, TopicStatus::Unanswered);
        assert_eq!(topic.author_login, "alice");
        assert_eq!(topic.course_name, "CS101");

        let course = service
            .database()
            .find_course_by_name_ignore_case("cs101")
            .unwrap()
            .unwrap();
        assert_eq!(course.category, crate::forum::model::DEFAULT_COURSE_CATEGORY);
    }

    #[test]
    fn course_is_reused_ignoring_case() {
        let (service, _dir, _topic) = setup_with_topic();
        let second = service
            .create_topic(new_topic("Other", "question", "cs101"), "bob")
            .unwrap();
        assert_eq!(second.course_name, "CS101");
    }

    #[test]
    fn duplicate_topic_is_rejected() {
        let (service, _dir, first) = setup_with_topic();

        let second = service.create_topic(new_topic("Help", "stuck on loop", "Other"), "bob");
        assert!(matches!(second, Err(ForumError::DuplicateTopic)));

        let topics = service.list_topics().unwrap();
        assert_eq!(topics, vec![first]);
        // The rejected request did not create its course either
        assert!(service
            .database()
            .find_course_by_name_ignore_case("Other")
            .unwrap()
            .is_none());
    }

    #[test]
    fn create_topic_requires_existing_author() {
        let (service, _dir) = test_service();
        let result = service.create_topic(new_topic("t", "b", "c"), "ghost");
        assert!(matches!(result, Err(ForumError::NotFound { resource: "user", .. })));
        assert!(service.list_topics().unwrap().is_empty());
    }

    #[test]
    fn author_can_change_status() {
        let (service, _dir, topic) = setup_with_topic();

        let solved = service
            .update_topic(&topic.id, &patch(None, None, Some("solucionado")), "alice")
            .unwrap();
        assert_eq!(solved.status, TopicStatus::Solved);

        let closed = service
            .update_topic(&topic.id, &patch(None, None, Some("CLOSED")), "alice")
            .unwrap();
        assert_eq!(closed.status, TopicStatus::Closed);
        assert_eq!(service.get_topic(&topic.id).unwrap().status, TopicStatus::Closed);
    }

    #[test]
    fn non_author_update_is_unauthorized_and_changes_nothing() {
        let (service, _dir, topic) = setup_with_topic();

        let result = service.update_topic(
            &topic.id,
            &patch(Some("Hijacked"), Some("pwned"), Some("closed")),
            "bob",
        );
        assert!(matches!(result, Err(ForumError::Unauthorized { .. })));
        assert_eq!(service.get_topic(&topic.id).unwrap(), topic);
    }

    #[test]
    fn invalid_status_keeps_title_and_body() {
        let (service, _dir, topic) = setup_with_topic();

        let result = service.update_topic(
            &topic.id,
            &patch(Some("New title"), Some("New body"), Some("bogus")),
            "alice",
        );
        assert!(matches!(result, Err(ForumError::InvalidStatus(_))));
        assert_eq!(service.get_topic(&topic.id).unwrap(), topic);
    }

    #[test]
    fn blank_title_updates_only_body() {
        let (service, _dir, topic) = setup_with_topic();

        let updated = service
            .update_topic(&topic.id, &patch(Some(""), Some("solved it myself"), None), "alice")
            .unwrap();
        assert_eq!(updated.title, "Help");
        assert_eq!(updated.body, "solved it myself");
        assert_eq!(updated.status, TopicStatus::Unanswered);
        assert_eq!(updated.created_at, topic.created_at);
    }

    #[test]
    fn missing_topic_is_not_found_for_any_requester() {
        let (service, _dir, _topic) = setup_with_topic();

        for login in ["alice", "bob"] {
            let update = service.update_topic("missing", &patch(Some("x"), None, None), login);
            assert!(matches!(update, Err(ForumError::NotFound { resource: "topic", .. })));

            let delete = service.delete_topic("missing", login);
            assert!(matches!(delete, Err(ForumError::NotFound { resource: "topic", .. })));
        }
    }

    #[test]
    fn author_delete_removes_topic_only() {
        let (service, _dir, topic) = setup_with_topic();

        service.delete_topic(&topic.id, "alice").unwrap();

        assert!(matches!(
            service.get_topic(&topic.id),
            Err(ForumError::NotFound { .. })
        ));
        assert!(service.find_user("alice").is_ok());
        assert!(service
            .database()
            .find_course_by_name_ignore_case("CS101")
            .unwrap()
            .is_some());
    }

    #[test]
    fn non_author_delete_is_unauthorized() {
        let (service, _dir, topic) = setup_with_topic();

        let result = service.delete_topic(&topic.id, "bob");
        assert!(matches!(result, Err(ForumError::Unauthorized { .. })));
        assert_eq!(service.get_topic(&topic.id).unwrap(), topic);
    }

    #[test]
    fn concurrent_updates_and_delete_do_not_corrupt() {
        let (service, _dir, topic) = setup_with_topic();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                let id = topic.id.clone();
                std::thread::spawn(move || {
                    if i == 4 {
                        service.delete_topic(&id, "alice").map(|_| ())
                    } else {
                        service
                            .update_topic(&id, &patch(None, Some(&format!("body {i}")), None), "alice")
                            .map(|_| ())
                    }
                })
            })
            .collect();

        for handle in handles {
            let outcome = handle.join().unwrap();
            assert!(matches!(outcome, Ok(()) | Err(ForumError::NotFound { .. })));
        }
        // Deletion committed at some point, and no later update resurrected it
        assert!(service.get_topic(&topic.id).is_err());
    }
}
