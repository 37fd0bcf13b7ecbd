//! Reference data backing the filter and form dropdowns.

use crate::domain::category::Category;
use crate::domain::role::Role;
use crate::repository::{CategoryReader, RoleReader};
use crate::services::{ServiceError, ServiceResult};

/// Lists categories, optionally narrowed by a search term.
pub async fn load_categories<R>(repo: &R, search: Option<&str>) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    let search = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    repo.list_categories(search).await.map_err(|err| {
        log::error!("Failed to load categories: {err}");
        ServiceError::from(err)
    })
}

pub async fn load_roles<R>(repo: &R) -> ServiceResult<Vec<Role>>
where
    R: RoleReader + ?Sized,
{
    repo.list_roles().await.map_err(|err| {
        log::error!("Failed to load roles: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    #[tokio::test]
    async fn blank_category_search_is_dropped() {
        let mut repo = MockRepository::new();
        repo.expect_list_categories()
            .withf(|search| search.is_none())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        assert!(load_categories(&repo, Some("   ")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_search_is_trimmed() {
        let mut repo = MockRepository::new();
        repo.expect_list_categories()
            .withf(|search| search.as_deref() == Some("lamps"))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        load_categories(&repo, Some(" lamps ")).await.unwrap();
    }
}
