use serde::Serialize;
use utoipa::ToSchema;

/// Page descriptor used in `pagination.next` / `pagination.prev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

/// Next/prev descriptors are present only when pages exist in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl Pagination {
    pub fn from_window(page: i64, limit: i64, total: i64) -> Self {
        let next = (page * limit < total).then_some(PageRef {
            page: page + 1,
            limit,
        });
        let prev = (page > 1).then_some(PageRef {
            page: page - 1,
            limit,
        });
        Self { next, prev }
    }
}

/// Success envelope: `{ "success": true, "data": ..., "count"?, "pagination"? }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            pagination: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    pub fn list(data: T, count: usize, pagination: Pagination) -> Self {
        Self {
            count: Some(count),
            pagination: Some(pagination),
            ..Self::success(data)
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            pagination: None,
            data: None,
        }
    }
}
