// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutating operations.
//!
//! Only the author of a resource may update or delete it. The checks here are
//! independent of storage: they work on values already loaded.

use super::{ForumError, ForumResult};

/// Trait for resources that have an author.
pub trait OwnedResource {
    /// Resource kind used in error messages.
    const KIND: &'static str;

    fn resource_id(&self) -> &str;

    /// Login of the identity that created the resource.
    fn author_login(&self) -> &str;
}

/// Whether `principal_login` may mutate a resource authored by
/// `resource_author_login`. Exact, case-sensitive match.
pub fn can_mutate(principal_login: &str, resource_author_login: &str) -> bool {
    principal_login == resource_author_login
}

/// Trait for enforcing ownership on loaded resources.
pub trait OwnershipEnforcer {
    /// Verify that `principal_login` authored this resource.
    ///
    /// # Errors
    /// Returns `ForumError::Unauthorized` otherwise.
    fn verify_ownership(&self, principal_login: &str) -> ForumResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, principal_login: &str) -> ForumResult<()> {
        if can_mutate(principal_login, self.author_login()) {
            Ok(())
        } else {
            Err(ForumError::Unauthorized {
                login: principal_login.to_string(),
                resource: T::KIND,
                id: self.resource_id().to_string(),
            })
        }
    }
}

/// Existence-then-ownership check on a lookup result.
///
/// A missing resource is `NotFound` whoever asks; only an existing one can
/// yield `Unauthorized`.
pub trait OwnershipCheck<T> {
    fn verify_owner(self, id: &str, principal_login: &str) -> ForumResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, id: &str, principal_login: &str) -> ForumResult<T> {
        match self {
            Some(resource) => {
                resource.verify_ownership(principal_login)?;
                Ok(resource)
            }
            None => Err(ForumError::not_found(T::KIND, id)),
        }
    }
}

impl<T: OwnedResource> OwnershipCheck<T> for ForumResult<Option<T>> {
    fn verify_owner(self, id: &str, principal_login: &str) -> ForumResult<T> {
        self?.verify_owner(id, principal_login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        id: String,
        author: String,
    }

    impl OwnedResource for TestResource {
        const KIND: &'static str = "test";

        fn resource_id(&self) -> &str {
            &self.id
        }

        fn author_login(&self) -> &str {
            &self.author
        }
    }

    fn resource(author: &str) -> TestResource {
        TestResource {
            id: "res-1".to_string(),
            author: author.to_string(),
        }
    }

    #[test]
    fn can_mutate_requires_exact_match() {
        assert!(can_mutate("alice", "alice"));
        assert!(!can_mutate("bob", "alice"));
        assert!(!can_mutate("Alice", "alice"));
        assert!(!can_mutate("alice ", "alice"));
    }

    #[test]
    fn ownership_verification_passes_for_author() {
        assert!(resource("alice").verify_ownership("alice").is_ok());
    }

    #[test]
    fn ownership_verification_fails_for_other_user() {
        let result = resource("alice").verify_ownership("bob");
        assert!(matches!(
            result,
            Err(ForumError::Unauthorized { ref login, resource: "test", ref id })
                if login == "bob" && id == "res-1"
        ));
    }

    #[test]
    fn ownership_check_on_option_some() {
        let found = Some(resource("alice")).verify_owner("res-1", "alice");
        assert!(found.is_ok());
    }

    #[test]
    fn missing_resource_is_not_found_for_everyone() {
        for login in ["alice", "bob"] {
            let result = None::<TestResource>.verify_owner("res-9", login);
            assert!(matches!(
                result,
                Err(ForumError::NotFound { resource: "test", ref id }) if id == "res-9"
            ));
        }
    }

    #[test]
    fn ownership_check_on_result_propagates_errors() {
        let failed: ForumResult<Option<TestResource>> =
            Err(ForumError::Validation("boom".to_string()));
        assert!(matches!(
            failed.verify_owner("res-1", "alice"),
            Err(ForumError::Validation(_))
        ));

        let found: ForumResult<Option<TestResource>> = Ok(Some(resource("alice")));
        assert!(matches!(
            found.verify_owner("res-1", "bob"),
            Err(ForumError::Unauthorized { .. })
        ));
    }
}
