//! Data models for the marketplace backend

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

pub mod auth;
pub use auth::*;

/// User model
///
/// Carries the password hash, so it is never serialized directly; use
/// [`UserResponse`] for anything leaving the server.
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            role: user.role,
        }
    }
}

/// User roles
#[derive(
    Debug, Default, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Buyer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Seller => "seller",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category, optionally nested under a parent
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_active: bool,
}

/// Body for category creation and full update
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CategoryCreate {
    #[validate(length(min = 2, max = 50))]
    pub name: String,

    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Product listed by a seller
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    pub rating: f64,
    pub category_id: i64,
    pub seller_id: i64,
    pub is_active: bool,
}

/// Body for product creation and full update
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct ProductCreate {
    #[validate(length(min = 3, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(custom = "validate_price")]
    pub price: Decimal,

    #[validate(length(max = 200))]
    pub image_url: Option<String>,

    #[validate(range(min = 0))]
    pub stock: i32,

    pub category_id: i64,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(ValidationError::new("price_must_be_positive"));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_has_more_than_two_decimals"));
    }
    // Upper bound of the NUMERIC(10, 2) column
    if *price > Decimal::new(9_999_999_999, 2) {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

/// Product review left by a buyer
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub comment: Option<String>,
    pub comment_date: DateTime<Utc>,
    pub grade: i32,
    pub is_active: bool,
}

/// Body for review creation
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct ReviewCreate {
    pub product_id: i64,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub grade: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(price: &str) -> ProductCreate {
        ProductCreate {
            name: "Desk lamp".to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            image_url: None,
            stock: 3,
            category_id: 1,
        }
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "\"seller\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("\"moderator\"").is_err());
    }

    #[test]
    fn test_product_price_validation() {
        assert!(product("19.99").validate().is_ok());
        assert!(product("0").validate().is_err());
        assert!(product("-5.00").validate().is_err());
        assert!(product("1.999").validate().is_err());
    }

    #[test]
    fn test_price_trailing_zeros_and_upper_bound() {
        assert!(product("19.990").validate().is_ok());
        assert!(product("5.000000").validate().is_ok());
        assert!(product("99999999.99").validate().is_ok());
        assert!(product("100000000").validate().is_err());
        assert!(product("123456789012").validate().is_err());
    }

    #[test]
    fn test_category_name_length() {
        let mut category = CategoryCreate {
            name: "Lighting".to_string(),
            parent_id: None,
        };
        assert!(category.validate().is_ok());
        category.name = "L".to_string();
        assert!(category.validate().is_err());
        category.name = "x".repeat(51);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_review_grade_range() {
        let mut review = ReviewCreate {
            product_id: 1,
            comment: Some("Solid".to_string()),
            grade: 5,
        };
        assert!(review.validate().is_ok());
        review.grade = 6;
        assert!(review.validate().is_err());
        review.grade = 0;
        assert!(review.validate().is_err());
    }
}
