//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::domain::Language;
use crate::infrastructure::repositories::{
    OeuvreRepository, UserRepository, category_store, tag_store,
};
use crate::services::{OeuvreService, TaxonomyService, UserService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub default_language: Language,
    pub users: UserService,
    pub oeuvres: OeuvreService,
    pub taxonomy: TaxonomyService,
}

impl AppState {
    /// Build every repository and service from one validated configuration
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let limits = config.page_limits();
        let search_len = config.max_search_length;

        let user_repo = UserRepository::new(limits, search_len);
        let oeuvre_repo = OeuvreRepository::new(limits, search_len);

        Self {
            users: UserService::new(db.clone(), user_repo.clone()),
            oeuvres: OeuvreService::new(db.clone(), oeuvre_repo, user_repo.clone()),
            taxonomy: TaxonomyService::new(
                db.clone(),
                category_store(limits, search_len),
                tag_store(limits, search_len),
                user_repo,
            ),
            default_language: config.default_language,
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

