use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub limit: Option<u64>,
    pub total: Option<u64>,
}

impl Meta {
    pub fn new(limit: u64, total: u64) -> Self {
        Self {
            limit: Some(limit),
            total: Some(total),
        }
    }

    pub fn total(total: usize) -> Self {
        Self {
            limit: None,
            total: Some(total as u64),
        }
    }

    pub fn empty() -> Self {
        Self {
            limit: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
