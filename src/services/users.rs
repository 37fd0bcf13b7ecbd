//! Services handling user account administration.

use crate::domain::types::UserId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::forms::user::{CreateUserForm, EditUserForm};
use crate::repository::UserWriter;
use crate::services::{ServiceError, ServiceResult, ensure_admin};

/// Validates the form and creates the account.
pub async fn create_user<R>(repo: &R, user: &User, form: &CreateUserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_user = NewUser::try_from(form).map_err(|err| {
        log::error!("Failed to validate user form: {err}");
        ServiceError::from(err)
    })?;

    repo.create_user(&new_user).await.map_err(|err| {
        log::error!("Failed to create a user: {err}");
        ServiceError::from(err)
    })
}

pub async fn update_user<R>(
    repo: &R,
    user: &User,
    user_id: &str,
    form: &EditUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let user_id = UserId::new(user_id)?;
    let updates = UpdateUser::try_from(form).map_err(|err| {
        log::error!("Failed to validate user form: {err}");
        ServiceError::from(err)
    })?;

    repo.update_user(&user_id, &updates).await.map_err(|err| {
        log::error!("Failed to update user {user_id}: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_user<R>(repo: &R, user: &User, user_id: &str) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    let user_id = UserId::new(user_id)?;
    repo.delete_user(&user_id).await.map_err(|err| {
        log::error!("Failed to delete user {user_id}: {err}");
        ServiceError::from(err)
    })
}

/// Flips the activation flag of `target`.
pub async fn toggle_active<R>(repo: &R, user: &User, target: &User) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.update_user(&target.id, &UpdateUser::active(!target.is_active))
        .await
        .map_err(|err| {
            log::error!("Failed to toggle user {}: {err}", target.id);
            ServiceError::from(err)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::{MockRepository, sample_user};

    fn create_form() -> CreateUserForm {
        CreateUserForm {
            username: "bob".into(),
            email: "bob@example.com".into(),
            full_name: "Bob Builder".into(),
            password: "secret1".into(),
            role_id: "user".into(),
        }
    }

    #[tokio::test]
    async fn regular_users_cannot_manage_accounts() {
        let repo = MockRepository::new();
        let viewer = sample_user("ann", false);

        assert!(matches!(
            create_user(&repo, &viewer, &create_form()).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            delete_user(&repo, &viewer, "bob").await,
            Err(ServiceError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn short_password_is_a_form_error() {
        let repo = MockRepository::new();
        let form = CreateUserForm {
            password: "123".into(),
            ..create_form()
        };
        let result = create_user(&repo, &sample_user("root", true), &form).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn toggle_sends_inverted_flag() {
        let mut repo = MockRepository::new();
        repo.expect_update_user()
            .withf(|id, updates| id.as_str() == "bob" && updates.is_active == Some(false))
            .times(1)
            .returning(|_, _| {
                let mut user = sample_user("bob", false);
                user.is_active = false;
                Ok(user)
            });

        let updated = toggle_active(&repo, &sample_user("root", true), &sample_user("bob", false))
            .await
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn api_validation_failure_is_surfaced() {
        let mut repo = MockRepository::new();
        repo.expect_create_user().returning(|_| {
            Err(RepositoryError::Api {
                status: 400,
                message: "Username already taken".into(),
                errors: None,
            })
        });

        let result = create_user(&repo, &sample_user("root", true), &create_form()).await;
        match result {
            Err(ServiceError::Repository(err)) => {
                assert_eq!(err.to_string(), "Username already taken")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
