use serde::Serialize;

const MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        Self {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            data,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: (total + pagination.limit - 1) / pagination.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let pagination = Pagination::new(None, None);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let pagination = Pagination::new(Some(0), Some(500));
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 100);

        let pagination = Pagination::new(Some(-3), Some(0));
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 1);
    }

    #[test]
    fn offset_follows_page() {
        let pagination = Pagination::new(Some(3), Some(25));
        assert_eq!(pagination.offset, 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 31, Pagination::new(Some(1), Some(10)));
        assert_eq!(response.total_pages, 4);

        let response = PaginatedResponse::new(Vec::<i32>::new(), 0, Pagination::new(None, None));
        assert_eq!(response.total_pages, 0);
    }
}
