mod common;

use common::{cast, create_category, create_work, insert_user, setup};
use heritage_catalog::domain::{Language, PageRequest};
use heritage_catalog::dto::{
    CreateTaxonomyDto, Localization, RegisterUserDto, UpdateUserDto, UserPublicDto,
};
use heritage_catalog::infrastructure::FindOptions;
use heritage_catalog::models::{Role, UserType, ValidationStatus, user};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde_json::json;

fn registration(payload: serde_json::Value) -> RegisterUserDto {
    RegisterUserDto::from_request(payload, Language::Fr)
}

#[tokio::test]
async fn test_register_account_kinds() {
    let state = setup().await;

    let visitor = state
        .users
        .register(registration(json!({
            "email": "  Lecteur@Example.org ",
            "password": "correct horse",
            "displayName": "Lecteur",
        })))
        .await
        .unwrap();
    assert_eq!(visitor.email, "lecteur@example.org");
    assert_eq!(visitor.user_type, UserType::Visitor);
    assert_eq!(visitor.validation_status, ValidationStatus::Approved);
    assert_eq!(visitor.role, Role::User);
    assert!(visitor.can_act());
    assert_ne!(visitor.password_hash, "correct horse");
    assert!(visitor.password_hash.starts_with("$argon2"));

    let artist = state
        .users
        .register(registration(json!({
            "email": "artiste@example.org",
            "password": "peinture-1962",
            "display_name": {"fr": "Baya", "ar": "باية"},
            "type": "artist",
        })))
        .await
        .unwrap();
    assert_eq!(artist.user_type, UserType::Artist);
    assert_eq!(artist.validation_status, ValidationStatus::Pending);
    assert_eq!(artist.display_name_ar.as_deref(), Some("باية"));
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let state = setup().await;
    let payload = json!({
        "email": "dup@example.org",
        "password": "longenough",
        "display_name": "Premier",
    });
    state.users.register(registration(payload.clone())).await.unwrap();

    let err = state
        .users
        .register(registration(json!({
            "email": "DUP@example.org",
            "password": "longenough",
            "display_name": "Second",
        })))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    let err = state
        .users
        .register(registration(json!({
            "email": "not-an-email",
            "password": "short",
            "user_type": "wizard",
        })))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    let fields: Vec<&str> = err
        .details()
        .unwrap()
        .iter()
        .map(|d| d.field.as_str())
        .collect();
    for expected in ["email", "password", "display_name", "user_type"] {
        assert!(fields.contains(&expected), "missing error for {expected}");
    }
}

#[tokio::test]
async fn test_validation_workflow() {
    let state = setup().await;
    let people = cast(&state).await;
    let pending = state
        .users
        .register(registration(json!({
            "email": "chercheuse@example.org",
            "password": "archives-2024",
            "display_name": "Chercheuse",
            "user_type": "researcher",
        })))
        .await
        .unwrap();

    let queue = state
        .users
        .pending_validations(people.moderator.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(queue.info.total, 1);

    let err = state
        .users
        .validate(pending.id, people.owner.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = state
        .users
        .reject(pending.id, people.moderator.id, " ")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let approved = state
        .users
        .validate(pending.id, people.moderator.id)
        .await
        .unwrap();
    assert_eq!(approved.validation_status, ValidationStatus::Approved);
    assert_eq!(approved.validated_by, Some(people.moderator.id));

    // Only pending accounts can be decided
    let err = state
        .users
        .validate(pending.id, people.moderator.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    let err = state
        .users
        .reject(pending.id, people.moderator.id, "duplicate")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_reject_account_records_reason() {
    let state = setup().await;
    let people = cast(&state).await;
    let pending = state
        .users
        .register(registration(json!({
            "email": "atelier@example.org",
            "password": "poterie-kabyle",
            "display_name": "Atelier",
            "user_type": "artisan",
        })))
        .await
        .unwrap();

    let rejected = state
        .users
        .reject(pending.id, people.admin.id, "  no portfolio ")
        .await
        .unwrap();
    assert_eq!(rejected.validation_status, ValidationStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("no portfolio"));
}

#[tokio::test]
async fn test_suspend_and_reactivate() {
    let state = setup().await;
    let people = cast(&state).await;

    let err = state
        .users
        .suspend(people.owner.id, people.admin.id, Some(7), "")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let err = state
        .users
        .suspend(people.owner.id, people.admin.id, Some(0), "spam")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let err = state
        .users
        .suspend(people.owner.id, people.moderator.id, Some(7), "spam")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = state
        .users
        .suspend(people.admin.id, people.admin.id, None, "test")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    let suspended = state
        .users
        .suspend(people.owner.id, people.admin.id, Some(7), "spam")
        .await
        .unwrap();
    assert!(suspended.is_suspended);
    assert!(!suspended.is_active);
    assert_eq!(suspended.suspended_by, Some(people.admin.id));
    assert_eq!(suspended.suspension_reason.as_deref(), Some("spam"));
    assert!(suspended.suspended_until.is_some());

    let err = state
        .users
        .suspend(people.owner.id, people.admin.id, None, "again")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    let listed = state
        .users
        .suspended(people.admin.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.info.total, 1);

    let active = state
        .users
        .reactivate(people.owner.id, people.admin.id)
        .await
        .unwrap();
    assert!(active.can_act());
    assert!(active.suspended_until.is_none());
    assert!(active.suspension_reason.is_none());

    let err = state
        .users
        .reactivate(people.owner.id, people.admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_expired_suspension_is_lifted() {
    let state = setup().await;
    let people = cast(&state).await;
    let yesterday = (chrono::Utc::now() - chrono::Duration::days(1)).to_rfc3339();
    let lapsed = user::ActiveModel {
        id: Set(people.owner.id),
        is_active: Set(false),
        is_suspended: Set(true),
        suspended_by: Set(Some(people.admin.id)),
        suspension_reason: Set(Some("cooling off".to_string())),
        suspended_until: Set(Some(yesterday)),
        ..Default::default()
    };
    lapsed.update(state.db()).await.unwrap();

    // Acting again lifts the suspension
    let work = create_work(&state, people.owner.id, "Retour").await;
    assert_eq!(work.work.owner_id, people.owner.id);

    let owner = state.users.get(people.owner.id).await.unwrap();
    assert!(owner.can_act());
    assert!(owner.suspended_until.is_none());
}

#[tokio::test]
async fn test_lapsed_suspension_can_be_renewed() {
    let state = setup().await;
    let people = cast(&state).await;
    let lapsed = user::ActiveModel {
        id: Set(people.other.id),
        is_active: Set(false),
        is_suspended: Set(true),
        suspended_by: Set(Some(people.admin.id)),
        suspension_reason: Set(Some("first warning".to_string())),
        suspended_until: Set(Some("2000-01-01T00:00:00+00:00".to_string())),
        ..Default::default()
    };
    lapsed.update(state.db()).await.unwrap();

    // The account never acted since, so the old flag is still set
    let renewed = state
        .users
        .suspend(people.other.id, people.admin.id, Some(3), "again")
        .await
        .unwrap();
    assert!(renewed.is_suspended);
    assert_eq!(renewed.suspension_reason.as_deref(), Some("again"));
    let until = renewed.suspended_until.unwrap();
    assert!(until.as_str() > chrono::Utc::now().to_rfc3339().as_str());

    // A running suspension still refuses a second one
    let err = state
        .users
        .suspend(people.other.id, people.admin.id, None, "third")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_profile_update_rules() {
    let state = setup().await;
    let people = cast(&state).await;
    let visitor = state
        .users
        .register(registration(json!({
            "email": "visiteur@example.org",
            "password": "musee-du-bardo",
            "display_name": "Visiteur",
        })))
        .await
        .unwrap();

    let err = state
        .users
        .update_profile(
            visitor.id,
            people.other.id,
            UpdateUserDto::from_request(json!({"bio": "intrus"}), Language::Fr),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = state
        .users
        .update_profile(
            visitor.id,
            visitor.id,
            UpdateUserDto::from_request(json!({"email": "owner@example.org"}), Language::Fr),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    // Becoming a professional sends the account back to validation
    let updated = state
        .users
        .update_profile(
            visitor.id,
            visitor.id,
            UpdateUserDto::from_request(
                json!({"userType": "author", "biography": {"en": "Reader turned writer"}}),
                Language::Fr,
            ),
        )
        .await
        .unwrap();
    assert_eq!(updated.user_type, UserType::Author);
    assert_eq!(updated.validation_status, ValidationStatus::Pending);
    assert_eq!(updated.display_name_fr.as_deref(), Some("Visiteur"));

    let public = UserPublicDto::from_model(&updated, Localization::new(Language::En));
    let value = serde_json::to_value(&public).unwrap();
    assert_eq!(value["biography"], "Reader turned writer");
    assert_eq!(value["displayName"], "Visiteur");
    assert!(value.get("email").is_none());
}

#[tokio::test]
async fn test_directory_lists_approved_professionals() {
    let state = setup().await;
    let people = cast(&state).await;
    state
        .users
        .register(registration(json!({
            "email": "enattente@example.org",
            "password": "en-attente-1",
            "display_name": "En attente",
            "user_type": "author",
        })))
        .await
        .unwrap();
    state
        .users
        .suspend(people.other.id, people.admin.id, None, "spam")
        .await
        .unwrap();

    // cast() accounts are approved authors; `other` is suspended
    let authors = state
        .users
        .directory(UserType::Author, PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<i32> = authors.data.iter().map(|u| u.id).collect();
    assert_eq!(authors.info.total, 3);
    assert!(!ids.contains(&people.other.id));

    let stats = state.users.stats(people.moderator.id).await.unwrap();
    assert_eq!(stats.registered.total, 5);
    assert_eq!(stats.pending_validation, 1);
    assert_eq!(stats.suspended, 1);
    assert_eq!(stats.by_type["author"], 5);
    assert_eq!(stats.by_type["visitor"], 0);

    let found = state
        .users
        .search(people.moderator.id, "attente", FindOptions::default())
        .await
        .unwrap();
    assert_eq!(found.info.total, 1);
}

#[tokio::test]
async fn test_delete_account_cascades_to_works() {
    let state = setup().await;
    let people = cast(&state).await;
    let work = create_work(&state, people.owner.id, "Éphémère").await;

    let err = state
        .users
        .delete(people.admin.id, people.admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    state.users.delete(people.owner.id, people.admin.id).await.unwrap();
    let err = state.users.get(people.owner.id).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    let gone = heritage_catalog::models::oeuvre::Entity::find_by_id(work.work.id)
        .one(state.db())
        .await
        .unwrap();
    assert!(gone.is_none());

    let err = state
        .users
        .delete(people.owner.id, people.admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_taxonomy_slugs_are_unique() {
    let state = setup().await;
    let people = cast(&state).await;
    let first = create_category(&state, people.moderator.id, "Poésie orale").await;
    assert_eq!(first.slug, "poesie-orale");

    let err = state
        .taxonomy
        .create_category(
            people.moderator.id,
            CreateTaxonomyDto::from_request(json!({"name": "Poesie Orale"}), Language::Fr),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    // Names without Latin letters need an explicit slug
    let err = state
        .taxonomy
        .create_tag(
            people.moderator.id,
            CreateTaxonomyDto::from_request(json!({"name": {"ar": "شعر"}}), Language::Ar),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    let tag = state
        .taxonomy
        .create_tag(
            people.moderator.id,
            CreateTaxonomyDto::from_request(json!({"name": {"ar": "شعر"}, "slug": "shiir"}), Language::Ar),
        )
        .await
        .unwrap();
    assert_eq!(tag.slug, "shiir");

    let err = state
        .taxonomy
        .create_tag(
            people.owner.id,
            CreateTaxonomyDto::from_request(json!({"name": "Conte"}), Language::Fr),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_plain_user_cannot_list_accounts() {
    let state = setup().await;
    let people = cast(&state).await;
    let stranger = insert_user(&state, "stranger@example.org", Role::User).await;

    let err = state
        .users
        .list(stranger.id, FindOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let all = state
        .users
        .list(people.moderator.id, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(all.info.total, 5);
}
