mod common;

use common::setup;
use heritage_catalog::models::{WorkStatus, category, oeuvre, user};
use heritage_catalog::seed::seed_demo_data;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_seed_is_idempotent() {
    let state = setup().await;
    seed_demo_data(state.db()).await.expect("first seed");
    seed_demo_data(state.db()).await.expect("second seed");

    assert_eq!(user::Entity::find().count(state.db()).await.unwrap(), 3);
    assert_eq!(category::Entity::find().count(state.db()).await.unwrap(), 3);
    assert_eq!(oeuvre::Entity::find().count(state.db()).await.unwrap(), 2);

    // Anonymous visitors only see the published demo work
    let public = state.oeuvres.list(None, Default::default()).await.unwrap();
    assert_eq!(public.info.total, 1);
    assert_eq!(public.data[0].work.status, WorkStatus::Published);
    assert_eq!(public.data[0].categories.len(), 1);
    assert_eq!(public.data[0].tags.len(), 1);

    let counts = state.oeuvres.status_counts().await.unwrap();
    assert_eq!(counts.len(), 6);
    assert!(counts.contains(&(WorkStatus::Published, 1)));
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), 2);
}
