use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::auth::hash_password;
use crate::models::{
    Role, UserType, ValidationStatus, WorkStatus, WorkType, category, oeuvre, oeuvre_categories,
    oeuvre_tags, tag, user,
};

fn account(
    email: &str,
    password_hash: &str,
    name: &str,
    role: Role,
    user_type: UserType,
) -> user::ActiveModel {
    let now = chrono::Utc::now().to_rfc3339();
    user::ActiveModel {
        email: Set(email.to_owned()),
        password_hash: Set(password_hash.to_owned()),
        display_name_fr: Set(Some(name.to_owned())),
        user_type: Set(user_type),
        role: Set(role),
        validation_status: Set(ValidationStatus::Approved),
        is_active: Set(true),
        is_suspended: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Demo accounts, taxonomy and a couple of works. Safe to run twice.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // 1. Accounts
    let password = hash_password("demo-password").map_err(DbErr::Custom)?;
    let accounts = [
        account("admin@heritage.local", &password, "Administration", Role::Admin, UserType::Institution),
        account("moderateur@heritage.local", &password, "Modération", Role::Moderator, UserType::Researcher),
        account("auteur@heritage.local", &password, "Taos Amrouche", Role::User, UserType::Author),
    ];
    for row in accounts {
        user::Entity::insert(row)
            .on_conflict(OnConflict::column(user::Column::Email).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    // 2. Categories and tags
    let now = chrono::Utc::now().to_rfc3339();
    for (slug, fr, ar, en) in [
        ("litterature", "Littérature", "أدب", "Literature"),
        ("musique", "Musique", "موسيقى", "Music"),
        ("artisanat", "Artisanat", "حرف تقليدية", "Crafts"),
    ] {
        let row = category::ActiveModel {
            slug: Set(slug.to_owned()),
            name_fr: Set(Some(fr.to_owned())),
            name_ar: Set(Some(ar.to_owned())),
            name_en: Set(Some(en.to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        category::Entity::insert(row)
            .on_conflict(OnConflict::column(category::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }
    for (slug, fr, tz_ltn) in [
        ("poesie-orale", "Poésie orale", "Tamedyazt"),
        ("kabylie", "Kabylie", "Tamurt n Leqbayel"),
    ] {
        let row = tag::ActiveModel {
            slug: Set(slug.to_owned()),
            name_fr: Set(Some(fr.to_owned())),
            name_tz_ltn: Set(Some(tz_ltn.to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        tag::Entity::insert(row)
            .on_conflict(OnConflict::column(tag::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    // 3. Works, only on an empty catalog
    if oeuvre::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    let Some(author) = user::Entity::find()
        .filter(user::Column::Email.eq("auteur@heritage.local"))
        .one(db)
        .await?
    else {
        return Ok(());
    };
    let Some(literature) = category::Entity::find()
        .filter(category::Column::Slug.eq("litterature"))
        .one(db)
        .await?
    else {
        return Ok(());
    };
    let oral_poetry = tag::Entity::find()
        .filter(tag::Column::Slug.eq("poesie-orale"))
        .one(db)
        .await?;

    let works = [
        ("Le Grain magique", Some("The Magic Grain"), WorkStatus::Published, Some(1966)),
        ("Chants berbères de Kabylie", None, WorkStatus::Pending, Some(1939)),
    ];
    for (title_fr, title_en, status, year) in works {
        let row = oeuvre::ActiveModel {
            title_fr: Set(Some(title_fr.to_owned())),
            title_en: Set(title_en.map(str::to_owned)),
            work_type: Set(WorkType::Book),
            publication_year: Set(year),
            original_language: Set(Some("fr".to_owned())),
            owner_id: Set(author.id),
            status: Set(status),
            submitted_at: Set(Some(now.clone())),
            validated_at: Set((status == WorkStatus::Published).then(|| now.clone())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let work = row.insert(db).await?;

        oeuvre_categories::ActiveModel {
            oeuvre_id: Set(work.id),
            category_id: Set(literature.id),
        }
        .insert(db)
        .await?;
        if let Some(poetry) = &oral_poetry {
            oeuvre_tags::ActiveModel {
                oeuvre_id: Set(work.id),
                tag_id: Set(poetry.id),
            }
            .insert(db)
            .await?;
        }
    }

    tracing::info!(author = author.id, "demo catalog seeded");
    Ok(())
}
