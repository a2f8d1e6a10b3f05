mod common;

use common::{cast, create_work_with, setup};
use heritage_catalog::domain::{Filter, OrderBy, PageLimits, StorageError};
use heritage_catalog::infrastructure::{FindOptions, OeuvreRepository, category_store};
use heritage_catalog::models::{WorkStatus, category};
use sea_orm::ActiveValue::Set;
use serde_json::json;

fn new_category(slug: &str, name_fr: &str) -> category::ActiveModel {
    category::ActiveModel {
        slug: Set(slug.to_string()),
        name_fr: Set(Some(name_fr.to_string())),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_second_page_of_fifteen() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);
    let rows = (1..=15)
        .map(|i| new_category(&format!("cat-{i:02}"), &format!("Catégorie {i}")))
        .collect();
    let created = store.bulk_create(state.db(), rows).await.unwrap();
    assert_eq!(created.len(), 15);
    assert!(created.iter().all(|c| !c.created_at.is_empty()));

    let page = store
        .find_all(state.db(), FindOptions::page(2, 10))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.info.total, 15);
    assert_eq!(page.info.total_pages, 2);
    assert!(!page.info.has_next);
    assert!(page.info.has_prev);
    // Default order is by slug
    assert_eq!(page.data[0].slug, "cat-11");

    let value = serde_json::to_value(&page.info).unwrap();
    assert_eq!(value["hasNext"], false);
    assert_eq!(value["totalPages"], 2);
}

#[tokio::test]
async fn test_page_limits_are_clamped() {
    let state = setup().await;
    let store = category_store(
        PageLimits {
            default_limit: 4,
            max_limit: 6,
        },
        200,
    );
    let rows = (1..=9)
        .map(|i| new_category(&format!("c{i}"), &format!("C{i}")))
        .collect();
    store.bulk_create(state.db(), rows).await.unwrap();

    let page = store.find_all(state.db(), FindOptions::default()).await.unwrap();
    assert_eq!(page.data.len(), 4);
    assert_eq!(page.info.page, 1);

    let page = store
        .find_all(state.db(), FindOptions::page(0, 500))
        .await
        .unwrap();
    assert_eq!(page.info.page, 1);
    assert_eq!(page.info.limit, 6);
    assert_eq!(page.data.len(), 6);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);
    let rows = (1..=3)
        .map(|i| new_category(&format!("loin-{i}"), &format!("Loin {i}")))
        .collect();
    store.bulk_create(state.db(), rows).await.unwrap();

    let page = store
        .find_all(state.db(), FindOptions::page(u64::MAX, 10))
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.info.total, 3);
    assert_eq!(page.info.page, i64::MAX as u64 / 10);
    assert!(!page.info.has_next);
    assert!(page.info.has_prev);
}

#[tokio::test]
async fn test_search_treats_percent_literally() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);
    store
        .bulk_create(
            state.db(),
            vec![
                new_category("remise-50", "Remise 50%"),
                new_category("remise-500", "Remise 500"),
                new_category("remise-5-0", "Remise 5_0"),
            ],
        )
        .await
        .unwrap();

    let found = store
        .search(state.db(), "50%", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(found.info.total, 1);
    assert_eq!(found.data[0].name_fr.as_deref(), Some("Remise 50%"));

    let underscore = store
        .search(state.db(), "5_0", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(underscore.info.total, 1);
    assert_eq!(underscore.data[0].slug, "remise-5-0");

    // A blank term lists everything
    let all = store
        .search(state.db(), "   ", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(all.info.total, 3);
}

#[tokio::test]
async fn test_search_across_languages() {
    let state = setup().await;
    let people = cast(&state).await;
    create_work_with(
        &state,
        people.owner.id,
        json!({"title": {"ar": "ألف ليلة وليلة", "en": "One Thousand and One Nights"}, "work_type": "book"}),
    )
    .await;
    create_work_with(
        &state,
        people.owner.id,
        json!({"title": "Les Mille et Une Nuits", "description": {"tz-ltn": "Timucuha"}, "work_type": "book"}),
    )
    .await;

    let works = OeuvreRepository::new(PageLimits::default(), 200);
    let arabic = works
        .search(state.db(), "ليلة", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(arabic.info.total, 1);

    let english = works
        .search(state.db(), "thousand", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(english.info.total, 1);
    assert_eq!(english.data[0].title_ar.as_deref(), Some("ألف ليلة وليلة"));

    let description = works
        .search(state.db(), "timucuha", None, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(description.info.total, 1);

    // Restricting the fields narrows the match
    let title_only = works
        .search(state.db(), "timucuha", Some(&["title"][..]), FindOptions::default())
        .await
        .unwrap();
    assert_eq!(title_only.info.total, 0);
}

#[tokio::test]
async fn test_unknown_fields_are_rejected() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);

    let err = store
        .find_all(
            state.db(),
            FindOptions::default().filtered(Filter::new().eq("colour", "red")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidField { ref field, .. } if field == "colour"));

    let err = store
        .find_all(
            state.db(),
            FindOptions::default().ordered(vec![OrderBy::desc("popularity")]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidField { .. }));

    let err = store.stats(state.db(), "published_on").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidField { .. }));
}

#[tokio::test]
async fn test_update_and_delete_report_absence() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);
    let created = store
        .create(state.db(), new_category("contes", "Contes"))
        .await
        .unwrap();

    let changes = category::ActiveModel {
        name_en: Set(Some("Tales".to_string())),
        ..Default::default()
    };
    let updated = store
        .update(state.db(), created.id, changes.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name_en.as_deref(), Some("Tales"));
    assert_eq!(updated.name_fr.as_deref(), Some("Contes"));
    assert_eq!(updated.slug, "contes");
    assert_eq!(updated.created_at, created.created_at);

    assert!(store.update(state.db(), 4_242, changes).await.unwrap().is_none());
    assert!(store.find_by_id(state.db(), 4_242).await.unwrap().is_none());

    assert!(store.delete(state.db(), created.id).await.unwrap());
    assert!(!store.delete(state.db(), created.id).await.unwrap());
}

#[tokio::test]
async fn test_unique_slug_violation() {
    let state = setup().await;
    let store = category_store(PageLimits::default(), 200);
    store
        .create(state.db(), new_category("danse", "Danse"))
        .await
        .unwrap();

    let err = store
        .create(state.db(), new_category("danse", "Danse bis"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::UniqueViolation(_)));
}

#[tokio::test]
async fn test_count_exists_and_stats() {
    let state = setup().await;
    let people = cast(&state).await;
    for title in ["Un", "Deux", "Trois"] {
        create_work_with(&state, people.owner.id, json!({"title": title, "work_type": "film"})).await;
    }

    let works = OeuvreRepository::new(PageLimits::default(), 200);
    let drafts = Filter::new().eq("status", WorkStatus::Draft);
    assert_eq!(works.count(state.db(), &drafts).await.unwrap(), 3);
    assert!(works.exists(state.db(), &drafts).await.unwrap());
    assert!(
        !works
            .exists(state.db(), &Filter::new().eq("status", WorkStatus::Published))
            .await
            .unwrap()
    );

    let stats = works.stats(state.db(), "created_at").await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 3);
    assert_eq!(stats.this_week, 3);
    assert_eq!(stats.this_month, 3);

    let counts = works.count_by_status(state.db()).await.unwrap();
    assert_eq!(counts.len(), 6);
    assert!(counts.contains(&(WorkStatus::Draft, 3)));
}

#[tokio::test]
async fn test_find_with_loads_associations() {
    let state = setup().await;
    let people = cast(&state).await;
    let record = create_work_with(&state, people.owner.id, json!({"title": "Seul", "work_type": "craft"})).await;

    let works = OeuvreRepository::new(PageLimits::default(), 200);
    let bare = works
        .find_with(state.db(), record.work.id, Default::default())
        .await
        .unwrap()
        .unwrap();
    assert!(bare.owner.is_none());

    let missing = works
        .find_with(state.db(), 777, Default::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    let page = works
        .find_by_owner(
            state.db(),
            people.owner.id,
            FindOptions::default().ordered(vec![OrderBy::asc("id")]),
        )
        .await
        .unwrap();
    assert_eq!(page.info.total, 1);
}
