//! Generic SeaORM repository
//!
//! [`Repository`] gives every entity the same capabilities: filtered and
//! ordered pagination, lookups, partial updates, deletion, sanitized
//! free-text search (expanded across language columns for translatable
//! fields), counts and date-range statistics.
//!
//! Operations take the connection as an argument so they run unchanged on
//! the pool or on the handle passed into [`with_transaction`].

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IdenStatic, IntoActiveModel,
    Iterable, Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, TransactionError, TransactionTrait,
};
use serde::Serialize;

use crate::domain::search::{
    DEFAULT_MAX_SEARCH_LENGTH, ESCAPE_CHAR, contains_pattern, sanitize_search_term,
};
use crate::domain::{
    Direction, Filter, FilterOp, Language, OrderBy, PageLimits, PageRequest, Paginated,
    StorageError,
};

/// Filter, ordering and page window for a listing
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub filter: Filter,
    pub order: Vec<OrderBy>,
    pub page: PageRequest,
}

impl FindOptions {
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            page: PageRequest::new(page, limit),
            ..Default::default()
        }
    }

    pub fn filtered(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn ordered(mut self, order: Vec<OrderBy>) -> Self {
        self.order = order;
        self
    }
}

/// Row counts over a date column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
}

/// Entity-agnostic data access for one SeaORM entity `E` and its
/// active model `A`.
#[derive(Clone)]
pub struct Repository<E, A> {
    entity: &'static str,
    limits: PageLimits,
    max_search_length: usize,
    search_fields: &'static [&'static str],
    translatable_fields: &'static [&'static str],
    default_order: Option<(&'static str, Direction)>,
    _marker: PhantomData<fn() -> (E, A)>,
}

impl<E, A> Repository<E, A> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            limits: PageLimits::default(),
            max_search_length: DEFAULT_MAX_SEARCH_LENGTH,
            search_fields: &[],
            translatable_fields: &[],
            default_order: None,
            _marker: PhantomData,
        }
    }

    pub fn with_limits(mut self, limits: PageLimits, max_search_length: usize) -> Self {
        self.limits = limits;
        self.max_search_length = max_search_length;
        self
    }

    /// Fields matched by [`search`](Self::search) when the caller names none
    pub fn searchable(mut self, fields: &'static [&'static str]) -> Self {
        self.search_fields = fields;
        self
    }

    /// Fields stored as one column per language (`<field>_<lang>`)
    pub fn translatable(mut self, fields: &'static [&'static str]) -> Self {
        self.translatable_fields = fields;
        self
    }

    pub fn default_order(mut self, field: &'static str, direction: Direction) -> Self {
        self.default_order = Some((field, direction));
        self
    }

    pub fn is_translatable(&self, field: &str) -> bool {
        self.translatable_fields.contains(&field)
    }

    /// Storage columns behind a logical field name
    fn expand_field(&self, field: &str) -> Vec<String> {
        if self.is_translatable(field) {
            Language::ALL
                .iter()
                .map(|lang| lang.column_name(field))
                .collect()
        } else {
            vec![field.to_string()]
        }
    }
}

impl<E, A> Repository<E, A>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Send + Sync + 'static,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    fn column(&self, field: &str) -> Result<E::Column, StorageError> {
        E::Column::from_str(field).map_err(|_| StorageError::InvalidField {
            entity: self.entity.to_string(),
            field: field.to_string(),
        })
    }

    fn condition(&self, filter: &Filter) -> Result<Condition, StorageError> {
        let mut condition = Condition::all();
        for (field, op) in &filter.clauses {
            let column = self.column(field)?;
            let expr = match op {
                FilterOp::Eq(value) => column.eq(value.clone()),
                FilterOp::Ne(value) => column.ne(value.clone()),
                FilterOp::In(values) => column.is_in(values.clone()),
                FilterOp::Gte(value) => column.gte(value.clone()),
                FilterOp::Lte(value) => column.lte(value.clone()),
                FilterOp::IsNull => column.is_null(),
                FilterOp::IsNotNull => column.is_not_null(),
            };
            condition = condition.add(expr);
        }
        Ok(condition)
    }

    fn ordered(&self, mut query: Select<E>, order: &[OrderBy]) -> Result<Select<E>, StorageError> {
        for item in order {
            query = query.order_by(self.column(&item.field)?, to_order(item.direction));
        }
        if order.is_empty()
            && let Some((field, direction)) = self.default_order
        {
            query = query.order_by(self.column(field)?, to_order(direction));
        }
        // Primary key last so pages never overlap on ties
        for key in <E::PrimaryKey as Iterable>::iter() {
            query = query.order_by(key.into_column(), Order::Asc);
        }
        Ok(query)
    }

    fn search_condition(&self, term: &str, fields: &[&str]) -> Result<Option<Condition>, StorageError> {
        let sanitized = sanitize_search_term(term, self.max_search_length);
        if sanitized.is_empty() {
            return Ok(None);
        }
        let pattern = contains_pattern(&sanitized);
        let mut any = Condition::any();
        for field in fields {
            for name in self.expand_field(field) {
                let column = self.column(&name)?;
                any = any.add(
                    Expr::col((column.entity_name(), column))
                        .like(LikeExpr::new(pattern.clone()).escape(ESCAPE_CHAR)),
                );
            }
        }
        Ok(Some(any))
    }

    /// Set `created_at` (unless provided) and `updated_at` when the entity has them.
    fn stamp(&self, active: &mut A, creating: bool) {
        let now = Utc::now().to_rfc3339();
        if creating
            && let Ok(column) = E::Column::from_str("created_at")
            && active.is_not_set(column)
        {
            active.set(column, now.clone().into());
        }
        if let Ok(column) = E::Column::from_str("updated_at") {
            active.set(column, now.into());
        }
    }

    async fn paginate<C: ConnectionTrait>(
        &self,
        db: &C,
        condition: Condition,
        options: &FindOptions,
    ) -> Result<Paginated<E::Model>, StorageError> {
        let page = options.page.resolve(self.limits);
        let query = E::find().filter(condition);
        let total = query.clone().count(db).await?;
        let rows = self
            .ordered(query, &options.order)?
            .offset(page.offset())
            .limit(page.limit)
            .all(db)
            .await?;

        tracing::debug!(
            entity = self.entity,
            page = page.page,
            limit = page.limit,
            total,
            "paginated query"
        );
        Ok(Paginated::new(rows, page, total))
    }

    /// One page of rows matching `options.filter`.
    pub async fn find_all<C: ConnectionTrait>(
        &self,
        db: &C,
        options: FindOptions,
    ) -> Result<Paginated<E::Model>, StorageError> {
        let condition = self.condition(&options.filter)?;
        self.paginate(db, condition, &options).await
    }

    /// `None` when no row has this id
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
    ) -> Result<Option<E::Model>, StorageError> {
        Ok(E::find_by_id(id).one(db).await?)
    }

    pub async fn find_one<C: ConnectionTrait>(
        &self,
        db: &C,
        filter: &Filter,
    ) -> Result<Option<E::Model>, StorageError> {
        let condition = self.condition(filter)?;
        Ok(E::find().filter(condition).one(db).await?)
    }

    pub async fn create<C: ConnectionTrait>(&self, db: &C, mut data: A) -> Result<E::Model, StorageError> {
        self.stamp(&mut data, true);
        Ok(data.insert(db).await?)
    }

    pub async fn bulk_create<C: ConnectionTrait>(
        &self,
        db: &C,
        data: Vec<A>,
    ) -> Result<Vec<E::Model>, StorageError> {
        let mut created = Vec::with_capacity(data.len());
        for item in data {
            created.push(self.create(db, item).await?);
        }
        Ok(created)
    }

    /// Apply every `Set` column of `changes` to the row. `None` when absent.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
        changes: A,
    ) -> Result<Option<E::Model>, StorageError> {
        let Some(existing) = E::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut active: A = existing.into_active_model();
        for column in <E::Column as Iterable>::iter() {
            let is_key = <E::PrimaryKey as Iterable>::iter()
                .any(|key| key.into_column().as_str() == column.as_str());
            if is_key {
                continue;
            }
            if let ActiveValue::Set(value) = changes.get(column) {
                active.set(column, value);
            }
        }
        self.stamp(&mut active, false);

        Ok(Some(active.update(db).await?))
    }

    /// `true` when a row existed and was removed
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: i32) -> Result<bool, StorageError> {
        let result = E::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Substring search over `fields` (or the configured search fields).
    ///
    /// Translatable fields are matched against every language column. An empty term
    /// after sanitization degrades to a plain filtered listing.
    pub async fn search<C: ConnectionTrait>(
        &self,
        db: &C,
        term: &str,
        fields: Option<&[&str]>,
        options: FindOptions,
    ) -> Result<Paginated<E::Model>, StorageError> {
        let fields = fields.unwrap_or(self.search_fields);
        let mut condition = self.condition(&options.filter)?;
        if let Some(matches) = self.search_condition(term, fields)? {
            condition = condition.add(matches);
        }
        self.paginate(db, condition, &options).await
    }

    pub async fn count<C: ConnectionTrait>(&self, db: &C, filter: &Filter) -> Result<u64, StorageError> {
        let condition = self.condition(filter)?;
        Ok(E::find().filter(condition).count(db).await?)
    }

    pub async fn exists<C: ConnectionTrait>(&self, db: &C, filter: &Filter) -> Result<bool, StorageError> {
        Ok(self.count(db, filter).await? > 0)
    }

    /// Totals since the start of the current day, week (Monday) and month, UTC.
    pub async fn stats<C: ConnectionTrait>(
        &self,
        db: &C,
        date_field: &str,
    ) -> Result<EntityStats, StorageError> {
        // Validates the field name before any query runs
        self.column(date_field)?;
        let now = Utc::now();
        let (day, week, month) = period_starts(now);

        let since = |start: DateTime<Utc>| {
            Filter::new()
                .gte(date_field, start.to_rfc3339())
                .lte(date_field, now.to_rfc3339())
        };

        Ok(EntityStats {
            total: self.count(db, &Filter::new()).await?,
            today: self.count(db, &since(day)).await?,
            this_week: self.count(db, &since(week)).await?,
            this_month: self.count(db, &since(month)).await?,
        })
    }
}

fn to_order(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    }
}

/// Start of the day, ISO week and month containing `now`
fn period_starts(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let month_start = today.with_day(1).unwrap_or(today);
    let midnight = |date: chrono::NaiveDate| date.and_time(NaiveTime::MIN).and_utc();
    (midnight(today), midnight(week_start), midnight(month_start))
}

/// Run `f` inside a transaction: commit when it returns `Ok`, roll back and
/// hand the error back otherwise.
///
/// The closure receives the transaction handle; every write that must be
/// atomic goes through it.
pub async fn with_transaction<F, T, Error>(db: &DatabaseConnection, f: F) -> Result<T, Error>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'c>>
        + Send,
    T: Send,
    Error: std::error::Error + From<DbErr> + Send,
{
    db.transaction::<F, T, Error>(f).await.map_err(|e| match e {
        TransactionError::Connection(db_err) => {
            tracing::error!(error = %db_err, "transaction could not be completed");
            Error::from(db_err)
        }
        TransactionError::Transaction(inner) => {
            tracing::warn!(error = %inner, "transaction rolled back");
            inner
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_starts_align_to_calendar() {
        // Thursday
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 13, 45, 0).unwrap();
        let (day, week, month) = period_starts(now);
        assert_eq!(day, Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap());
        assert_eq!(week, Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap());
        assert_eq!(month, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
    }
}
