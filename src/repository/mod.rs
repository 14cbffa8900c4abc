//! Persistence collaborators
//!
//! Services only see these traits. [`postgres`] backs them with sqlx;
//! [`memory`] keeps everything in process for tests and local runs.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Category, CategoryCreate, Product, ProductCreate, Review, ReviewCreate, User, UserRole,
};

pub mod memory;
pub mod postgres;

pub use memory::{
    InMemoryCategoryRepository, InMemoryProductRepository, InMemoryReviewRepository,
    InMemoryUserRepository,
};
pub use postgres::{
    PgCategoryRepository, PgProductRepository, PgReviewRepository, PgUserRepository,
};

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{0} not found or inactive")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Fields needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub role: UserRole,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_active_user_by_email(&self, email: &str)
        -> Result<Option<User>, RepositoryError>;

    async fn find_active_user_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    /// Active or not; registration must not reuse a deactivated email
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// Fails with `NotFound` if no active user has this id
    async fn update_user_role(&self, id: i64, role: UserRole) -> Result<User, RepositoryError>;

    /// Soft delete
    async fn deactivate_user(&self, id: i64) -> Result<User, RepositoryError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError>;

    async fn create(&self, category: CategoryCreate) -> Result<Category, RepositoryError>;

    /// Fails with `NotFound` if no active category has this id
    async fn update(&self, id: i64, category: CategoryCreate)
        -> Result<Category, RepositoryError>;

    /// Soft delete
    async fn deactivate(&self, id: i64) -> Result<Category, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active products, optionally restricted to one category
    async fn list_active(&self, category_id: Option<i64>) -> Result<Vec<Product>, RepositoryError>;

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError>;

    async fn create(&self, seller_id: i64, product: ProductCreate)
        -> Result<Product, RepositoryError>;

    async fn update(&self, id: i64, product: ProductCreate) -> Result<Product, RepositoryError>;

    /// Soft delete
    async fn deactivate(&self, id: i64) -> Result<Product, RepositoryError>;

    async fn set_rating(&self, id: i64, rating: f64) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Active reviews, optionally restricted to one product
    async fn list_active(&self, product_id: Option<i64>) -> Result<Vec<Review>, RepositoryError>;

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Review>, RepositoryError>;

    /// Fails with `Conflict` if the user already reviewed the product
    async fn create(&self, user_id: i64, review: ReviewCreate) -> Result<Review, RepositoryError>;

    /// Soft delete
    async fn deactivate(&self, id: i64) -> Result<Review, RepositoryError>;

    /// Mean grade of active reviews, 0.0 when there are none
    async fn average_grade(&self, product_id: i64) -> Result<f64, RepositoryError>;
}
