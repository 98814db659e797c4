//! Success envelopes shared by all resources

use serde::Serialize;

/// `{ success, message?, data }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// `{ success, count, data }`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{ success, message }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_counts_items() {
        let json = serde_json::to_value(ListResponse::new(vec![1, 2, 3])).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_message_omitted_when_absent() {
        let json = serde_json::to_value(DataResponse::new("x")).unwrap();
        assert!(json.get("message").is_none());

        let json = serde_json::to_value(DataResponse::with_message("Saved", "x")).unwrap();
        assert_eq!(json["message"], "Saved");
    }
}
