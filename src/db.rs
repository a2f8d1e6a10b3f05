use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    run_migrations(&db).await?;

    Ok(db)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        display_name_fr TEXT,
        display_name_ar TEXT,
        display_name_en TEXT,
        display_name_tz_ltn TEXT,
        display_name_tz_tfng TEXT,
        biography_fr TEXT,
        biography_ar TEXT,
        biography_en TEXT,
        biography_tz_ltn TEXT,
        biography_tz_tfng TEXT,
        user_type TEXT NOT NULL DEFAULT 'visitor',
        role TEXT NOT NULL DEFAULT 'user',
        validation_status TEXT NOT NULL DEFAULT 'pending',
        validated_by INTEGER,
        validated_at TEXT,
        rejection_reason TEXT,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        is_suspended BOOLEAN NOT NULL DEFAULT 0,
        suspended_by INTEGER,
        suspension_reason TEXT,
        suspended_at TEXT,
        suspended_until TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slug TEXT NOT NULL UNIQUE,
        name_fr TEXT,
        name_ar TEXT,
        name_en TEXT,
        name_tz_ltn TEXT,
        name_tz_tfng TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slug TEXT NOT NULL UNIQUE,
        name_fr TEXT,
        name_ar TEXT,
        name_en TEXT,
        name_tz_ltn TEXT,
        name_tz_tfng TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS oeuvres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title_fr TEXT,
        title_ar TEXT,
        title_en TEXT,
        title_tz_ltn TEXT,
        title_tz_tfng TEXT,
        description_fr TEXT,
        description_ar TEXT,
        description_en TEXT,
        description_tz_ltn TEXT,
        description_tz_tfng TEXT,
        work_type TEXT NOT NULL,
        publication_year INTEGER,
        original_language TEXT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        validator_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        status TEXT NOT NULL DEFAULT 'draft',
        submitted_at TEXT,
        validated_at TEXT,
        rejection_reason TEXT,
        archived_at TEXT,
        deleted_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_oeuvres_status ON oeuvres(status)",
    "CREATE INDEX IF NOT EXISTS idx_oeuvres_owner ON oeuvres(owner_id)",
    r#"
    CREATE TABLE IF NOT EXISTS oeuvre_categories (
        oeuvre_id INTEGER NOT NULL REFERENCES oeuvres(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        PRIMARY KEY (oeuvre_id, category_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS oeuvre_tags (
        oeuvre_id INTEGER NOT NULL REFERENCES oeuvres(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (oeuvre_id, tag_id)
    )
    "#,
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    for sql in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    tracing::debug!(statements = SCHEMA.len(), "schema ready");
    Ok(())
}
