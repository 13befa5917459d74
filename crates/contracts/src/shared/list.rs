//! Контракт постраничных списков: запрос, ответ и метаданные пагинации
use serde::{Deserialize, Serialize};

/// Допустимые размеры страницы
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Размер страницы по умолчанию
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Значение `searchField`, означающее поиск по всем полям
pub const SEARCH_ALL_FIELDS: &str = "all";

pub fn is_valid_page_size(size: usize) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

/// Параметры запроса страницы списка
///
/// Сериализуется в query string (`?page=1&pageSize=10&search=...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Номер страницы, начиная с 1
    pub page: usize,
    pub page_size: usize,
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_search_field")]
    pub search_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

fn default_search_field() -> String {
    SEARCH_ALL_FIELDS.to_string()
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            search_field: default_search_field(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

/// Метаданные пагинации, которые возвращает сервер
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_records: usize,
    pub total_pages: usize,
    pub start_record: usize,
    pub end_record: usize,
}

impl Pagination {
    /// Вычисляет метаданные по общему числу записей (так же считает backend)
    pub fn compute(total_records: usize, page: usize, page_size: usize) -> Self {
        if total_records == 0 || page_size == 0 {
            return Self::default();
        }
        let total_pages = (total_records + page_size - 1) / page_size;
        let page = page.clamp(1, total_pages);
        let start_record = (page - 1) * page_size + 1;
        let end_record = (page * page_size).min(total_records);
        Self {
            total_records,
            total_pages,
            start_record,
            end_record,
        }
    }
}

/// Ответ `list`: данные текущей страницы и пагинация
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_compute() {
        let p = Pagination::compute(250, 3, 10);
        assert_eq!(p.total_pages, 25);
        assert_eq!(p.start_record, 21);
        assert_eq!(p.end_record, 30);

        let last = Pagination::compute(95, 10, 10);
        assert_eq!(last.start_record, 91);
        assert_eq!(last.end_record, 95);

        assert_eq!(Pagination::compute(0, 1, 10), Pagination::default());
    }

    #[test]
    fn test_list_response_deserialize() {
        let json = r#"{
            "data": [1, 2, 3],
            "pagination": {"totalRecords": 3, "totalPages": 1, "startRecord": 1, "endRecord": 3}
        }"#;
        let resp: ListResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data, vec![1, 2, 3]);
        assert_eq!(resp.pagination.total_records, 3);
        assert_eq!(resp.pagination.end_record, 3);
    }

    #[test]
    fn test_query_defaults_and_names() {
        let query = ListQuery {
            sort_field: Some("name".to_string()),
            sort_direction: SortDirection::Desc,
            ..ListQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["searchField"], "all");
        assert_eq!(value["sortField"], "name");
        assert_eq!(value["sortDirection"], "desc");
    }

    #[test]
    fn test_page_size_options() {
        assert!(is_valid_page_size(25));
        assert!(!is_valid_page_size(30));
        assert!(is_valid_page_size(DEFAULT_PAGE_SIZE));
    }
}
