//! Request DTOs for the service API
//!
//! Every field is optional on the wire so that a missing field becomes an
//! `InvalidArgument` outcome instead of a body rejection.

use serde::Deserialize;

use crate::error::ServiceError;
use crate::models::{NewProduct, NewUser};

/// Request body for POST /products
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl CreateProductRequest {
    /// Checks required fields and produces the product draft.
    pub fn into_draft(self) -> Result<NewProduct, ServiceError> {
        match (non_empty(self.name), self.price) {
            (Some(name), Some(price)) => Ok(NewProduct {
                name,
                description: self.description,
                price,
            }),
            _ => Err(ServiceError::InvalidArgument(
                "name and price required".to_string(),
            )),
        }
    }
}

/// Request body for POST /users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Checks required fields and produces the user draft.
    pub fn into_draft(self) -> Result<NewUser, ServiceError> {
        match (non_empty(self.username), non_empty(self.email)) {
            (Some(username), Some(email)) => Ok(NewUser { username, email }),
            _ => Err(ServiceError::InvalidArgument(
                "username and email required".to_string(),
            )),
        }
    }
}

/// Request body for POST /cache
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_request_requires_name_and_price() {
        let req: CreateProductRequest = serde_json::from_str(r#"{"name": "Lamp"}"#).unwrap();
        assert!(matches!(
            req.into_draft(),
            Err(ServiceError::InvalidArgument(_))
        ));

        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name": "", "price": 3.0}"#).unwrap();
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn test_product_request_allows_zero_price_and_no_description() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name": "Sample", "price": 0.0}"#).unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_user_request() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"username": "ana", "email": "ana@x.com"}"#).unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.username, "ana");

        let req: CreateUserRequest = serde_json::from_str(r#"{"username": "ana"}"#).unwrap();
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn test_set_request_fields_are_optional() {
        let req: SetRequest = serde_json::from_str(r#"{"key": "k"}"#).unwrap();
        assert_eq!(req.key.as_deref(), Some("k"));
        assert!(req.value.is_none());
    }
}
