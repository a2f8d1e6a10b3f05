use serde::Deserialize;

use crate::domain::{Filter, Language, OrderBy, PageRequest};
use crate::dto::Localization;
use crate::infrastructure::repositories::FindOptions;
use crate::models::WorkStatus;
use crate::services::ServiceError;

/// Query string of list endpoints:
/// `?page=2&limit=10&order=-created_at&status=pending&lang=ar&full=true`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Comma separated, e.g. `-created_at,title_fr`
    pub order: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub full: bool,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn localization(&self, default: Language) -> Localization {
        Localization::from_params(self.lang.as_deref(), self.full, default)
    }

    /// Page window, ordering and the status filter of a work listing
    pub fn find_options(&self) -> Result<FindOptions, ServiceError> {
        let mut order = Vec::new();
        for raw in self.order.iter().flat_map(|o| o.split(',')) {
            if raw.trim().is_empty() {
                continue;
            }
            let item = OrderBy::parse(raw)
                .ok_or_else(|| ServiceError::invalid("order", "is not a valid ordering"))?;
            order.push(item);
        }

        let mut filter = Filter::new();
        if let Some(raw) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            let status = WorkStatus::parse(raw)
                .ok_or_else(|| ServiceError::invalid("status", "is not a known status"))?;
            filter = filter.eq("status", status);
        }

        Ok(FindOptions {
            filter,
            order,
            page: self.page_request(),
        })
    }
}
