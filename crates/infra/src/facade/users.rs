use tracing::debug;

use lodgebase_core::{DomainError, DomainResult, Entity, UserId};
use lodgebase_users::user::email_key;
use lodgebase_users::{NewUser, User, UserPatch};

use super::Facade;
use crate::config::DeletePolicy;
use crate::repository::Repository;

impl Facade {
    /// Register a user. Emails are unique across all users, ignoring case and
    /// surrounding whitespace.
    pub fn create_user(&self, input: NewUser) -> DomainResult<User> {
        // Validation and password hashing happen before the lock is taken.
        let user = User::new(input)?;

        let _relations = self.lock();
        self.ensure_email_free(user.email(), None)?;
        self.users.add(user.clone())?;

        debug!(user_id = %user.id(), "user created");
        Ok(user)
    }

    pub fn get_user(&self, id: &UserId) -> Option<User> {
        self.users.get(id)
    }

    /// Look a user up by email, ignoring case and surrounding whitespace.
    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .get_by_attribute("email_key", &serde_json::Value::from(email_key(email)))
    }

    pub fn get_all_users(&self) -> Vec<User> {
        self.users.get_all()
    }

    /// Patch a user. A new password is hashed before any lock is taken.
    pub fn update_user(&self, id: &UserId, patch: &UserPatch) -> DomainResult<User> {
        let update = patch.prepare()?;

        let _relations = self.lock();
        self.resolve_user(id)?;
        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(id))?;
        }

        let user = self.users.update(id, &update)?;
        debug!(user_id = %id, "user updated");
        Ok(user)
    }

    /// Delete a user. Deleting an unknown id is a no-op.
    ///
    /// Under [`DeletePolicy::Restrict`] a user who still owns places or has
    /// written reviews is kept and `Conflict` is returned. Under
    /// [`DeletePolicy::Cascade`] their reviews, their places and the reviews
    /// on those places are removed first.
    pub fn delete_user(&self, id: &UserId) -> DomainResult<()> {
        let mut relations = self.lock();
        if self.users.get(id).is_none() {
            return Ok(());
        }

        let places = relations.places_by_owner.dependents(id);
        let reviews = relations.reviews_by_author.dependents(id);
        let has_dependents = !places.is_empty() || !reviews.is_empty();
        if self.delete_policy == DeletePolicy::Restrict && has_dependents {
            return Err(DomainError::conflict(format!(
                "{} `{id}` still owns {} place(s) and authored {} review(s)",
                User::KIND,
                places.len(),
                reviews.len()
            )));
        }

        for review_id in &reviews {
            self.remove_review(&mut relations, review_id);
        }
        for place_id in &places {
            self.remove_place_cascading(&mut relations, place_id);
        }
        self.users.delete(id);

        debug!(
            user_id = %id,
            places = places.len(),
            reviews = reviews.len(),
            "user deleted"
        );
        Ok(())
    }

    /// Caller holds the lock.
    fn ensure_email_free(&self, email: &str, except: Option<&UserId>) -> DomainResult<()> {
        match self.get_user_by_email(email) {
            Some(existing) if Some(existing.id()) != except => {
                let email = email.trim();
                Err(DomainError::conflict(format!(
                    "email `{email}` is already registered"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use lodgebase_core::ErrorKind;

    use super::*;

    fn ana() -> NewUser {
        NewUser {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret123".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn create_and_fetch_user() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let user = facade.create_user(ana()).unwrap();

        assert_eq!(facade.get_user(user.id()), Some(user.clone()));
        assert_eq!(facade.get_user_by_email("ana@example.com"), Some(user.clone()));
        assert_eq!(facade.get_all_users(), vec![user]);
        assert_eq!(facade.get_user_by_email("bob@example.com"), None);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        facade.create_user(ana()).unwrap();

        let err = facade
            .create_user(NewUser {
                first_name: "Other".to_string(),
                ..ana()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(facade.get_all_users().len(), 1);
    }

    #[test]
    fn email_conflicts_ignore_case_and_padding() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let first = facade.create_user(ana()).unwrap();

        for email in ["ANA@example.com", " ana@example.com ", "Ana@Example.Com"] {
            let err = facade
                .create_user(NewUser {
                    email: email.to_string(),
                    ..ana()
                })
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conflict, "{email}");
        }
        assert_eq!(facade.get_all_users().len(), 1);
        assert_eq!(facade.get_user_by_email(" ANA@EXAMPLE.COM"), Some(first));
    }

    #[test]
    fn invalid_user_is_not_stored() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let err = facade
            .create_user(NewUser {
                email: "not-an-email".to_string(),
                ..ana()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(facade.get_all_users().is_empty());
    }

    #[test]
    fn update_user_keeps_email_unique() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let first = facade.create_user(ana()).unwrap();
        let bob = facade
            .create_user(NewUser {
                first_name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                ..ana()
            })
            .unwrap();

        let steal = UserPatch {
            email: Some("ana@example.com".to_string()),
            ..UserPatch::default()
        };
        assert_eq!(
            facade.update_user(bob.id(), &steal).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert_eq!(facade.get_user(bob.id()).unwrap().email(), "bob@example.com");

        // Re-submitting your own email is not a collision.
        let same = UserPatch {
            email: Some("ana@example.com".to_string()),
            first_name: Some("Anna".to_string()),
            ..UserPatch::default()
        };
        let updated = facade.update_user(first.id(), &same).unwrap();
        assert_eq!(updated.first_name(), "Anna");
    }

    #[test]
    fn update_user_changes_password_and_admin_flag() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let user = facade.create_user(ana()).unwrap();

        let patch = UserPatch {
            password: Some("hunter22".to_string()),
            is_admin: Some(true),
            ..UserPatch::default()
        };
        let updated = facade.update_user(user.id(), &patch).unwrap();
        assert!(updated.is_admin());
        assert!(updated.check_password("hunter22"));
        assert!(!updated.check_password("secret123"));
    }

    #[test]
    fn empty_password_update_changes_nothing() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let user = facade.create_user(ana()).unwrap();

        let patch = UserPatch {
            first_name: Some("Anna".to_string()),
            password: Some(String::new()),
            ..UserPatch::default()
        };
        let err = facade.update_user(user.id(), &patch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let stored = facade.get_user(user.id()).unwrap();
        assert_eq!(stored, user);
        assert!(stored.check_password("secret123"));
    }

    #[test]
    fn update_missing_user_is_not_found() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let err = facade
            .update_user(&UserId::from("missing"), &UserPatch::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_user_without_dependents() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let user = facade.create_user(ana()).unwrap();

        facade.delete_user(user.id()).unwrap();
        assert_eq!(facade.get_user(user.id()), None);
        // Second delete is a no-op.
        facade.delete_user(user.id()).unwrap();
        // The email is free again.
        facade.create_user(ana()).unwrap();
    }
}
