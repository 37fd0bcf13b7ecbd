use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::user::User;
use crate::models::config::ClientConfig;
use crate::query::controller::{ControllerOptions, ListSource};
use crate::query::descriptor::{QueryDescriptor, SortKey};
use crate::repository::errors::RepositoryResult;
use crate::repository::{Page, UserReader};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSort {
    Username,
    Email,
    FullName,
    #[default]
    CreatedAt,
}

impl SortKey for UserSort {
    fn as_str(&self) -> &'static str {
        match self {
            UserSort::Username => "username",
            UserSort::Email => "email",
            UserSort::FullName => "full_name",
            UserSort::CreatedAt => "created_at",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "username" => Some(UserSort::Username),
            "email" => Some(UserSort::Email),
            "full_name" => Some(UserSort::FullName),
            "created_at" => Some(UserSort::CreatedAt),
            _ => None,
        }
    }
}

pub type UserQuery = QueryDescriptor<UserSort>;

/// [`ListSource`] over the `/users` endpoint. The user table only searches.
pub struct UserDirectory<R> {
    repo: Arc<R>,
}

impl<R> UserDirectory<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> ListSource for UserDirectory<R>
where
    R: UserReader + 'static,
{
    type Item = User;
    type Sort = UserSort;

    async fn list(
        &self,
        query: &UserQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<User>> {
        self.repo.list_users(query, cancel).await
    }

    fn normalize_filter(&self, name: &str, _raw: &str) -> Result<Option<String>, String> {
        Err(format!("Users cannot be filtered by `{name}`"))
    }
}

pub fn admin_options(config: &ClientConfig) -> ControllerOptions<UserSort> {
    ControllerOptions::from_config(config, UserQuery::new(config.page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    #[test]
    fn sort_keys_round_trip() {
        for sort in [
            UserSort::Username,
            UserSort::Email,
            UserSort::FullName,
            UserSort::CreatedAt,
        ] {
            assert_eq!(UserSort::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(UserSort::parse("role"), None);
    }

    #[test]
    fn filters_are_rejected() {
        let directory = UserDirectory::new(Arc::new(MockRepository::new()));
        assert!(directory.normalize_filter("role_id", "r-1").is_err());
    }

    #[test]
    fn query_uses_user_sort_field() {
        let query = UserQuery::new(10).with_search("ann");
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("search".to_string(), "ann".to_string())));
        assert!(pairs.contains(&("sort_by".to_string(), "created_at".to_string())));
    }
}
