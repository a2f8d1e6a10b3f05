#![allow(dead_code)]

use heritage_catalog::config::Config;
use heritage_catalog::db;
use heritage_catalog::domain::Language;
use heritage_catalog::dto::{CreateOeuvreDto, CreateTaxonomyDto};
use heritage_catalog::infrastructure::{AppState, OeuvreRecord};
use heritage_catalog::models::{Role, UserType, ValidationStatus, category, tag, user};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};

// Helper to create a test app state
pub async fn setup() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db, &Config::default())
}

// Helper to create an approved, active account with the given role
pub async fn insert_user(state: &AppState, email: &str, role: Role) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let account = user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        display_name_fr: Set(Some(email.split('@').next().unwrap_or(email).to_string())),
        user_type: Set(UserType::Author),
        role: Set(role),
        validation_status: Set(ValidationStatus::Approved),
        is_active: Set(true),
        is_suspended: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    account
        .insert(state.db())
        .await
        .expect("Failed to create user")
}

pub struct Cast {
    pub owner: user::Model,
    pub other: user::Model,
    pub moderator: user::Model,
    pub admin: user::Model,
}

pub async fn cast(state: &AppState) -> Cast {
    Cast {
        owner: insert_user(state, "owner@example.org", Role::User).await,
        other: insert_user(state, "other@example.org", Role::User).await,
        moderator: insert_user(state, "moderator@example.org", Role::Moderator).await,
        admin: insert_user(state, "admin@example.org", Role::Admin).await,
    }
}

pub async fn create_work_with(state: &AppState, owner_id: i32, payload: Value) -> OeuvreRecord {
    state
        .oeuvres
        .create(owner_id, CreateOeuvreDto::from_request(payload, Language::Fr))
        .await
        .expect("Failed to create work")
}

pub async fn create_work(state: &AppState, owner_id: i32, title: &str) -> OeuvreRecord {
    create_work_with(state, owner_id, json!({"title": title, "work_type": "book"})).await
}

pub async fn create_category(state: &AppState, actor_id: i32, name: &str) -> category::Model {
    state
        .taxonomy
        .create_category(
            actor_id,
            CreateTaxonomyDto::from_request(json!({"name": name}), Language::Fr),
        )
        .await
        .expect("Failed to create category")
}

pub async fn create_tag(state: &AppState, actor_id: i32, name: &str) -> tag::Model {
    state
        .taxonomy
        .create_tag(
            actor_id,
            CreateTaxonomyDto::from_request(json!({"name": name}), Language::Fr),
        )
        .await
        .expect("Failed to create tag")
}
