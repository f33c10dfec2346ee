// Record list query

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl RecordListQuery {
    pub fn page(&self) -> usize {
        self.page.filter(|page| *page > 0).unwrap_or(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE)
    }
}
