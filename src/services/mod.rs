//! Business logic services

pub mod catalog;
pub mod lending;
pub mod reports;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
        }
    }
}
