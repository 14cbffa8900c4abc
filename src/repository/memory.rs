//! In-process repositories

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{
    Category, CategoryCreate, Product, ProductCreate, Review, ReviewCreate, User, UserRole,
};

use super::{
    CategoryRepository, NewUser, ProductRepository, RepositoryError, ReviewRepository,
    UserRepository,
};

/// Sequential integer ids starting at 1
#[derive(Debug)]
struct IdSequence(AtomicI64);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
    ids: IdSequence,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_active_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.is_active && u.email == email)
            .cloned())
    }

    async fn find_active_user_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| u.is_active).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} already exists",
                new_user.email
            )));
        }

        let user = User {
            id: self.ids.next(),
            email: new_user.email,
            hashed_password: new_user.hashed_password,
            is_active: true,
            role: new_user.role,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user_role(&self, id: i64, role: UserRole) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .filter(|u| u.is_active)
            .ok_or(RepositoryError::NotFound("User"))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn deactivate_user(&self, id: i64) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .filter(|u| u.is_active)
            .ok_or(RepositoryError::NotFound("User"))?;
        user.is_active = false;
        Ok(user.clone())
    }
}

#[derive(Debug)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<i64, Category>>,
    ids: IdSequence,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_active(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = self.categories.read().await;
        let mut active: Vec<Category> = categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|c| c.id);
        Ok(active)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).filter(|c| c.is_active).cloned())
    }

    async fn create(&self, category: CategoryCreate) -> Result<Category, RepositoryError> {
        let category = Category {
            id: self.ids.next(),
            name: category.name,
            parent_id: category.parent_id,
            is_active: true,
        };
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        id: i64,
        update: CategoryCreate,
    ) -> Result<Category, RepositoryError> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .filter(|c| c.is_active)
            .ok_or(RepositoryError::NotFound("Category"))?;
        category.name = update.name;
        category.parent_id = update.parent_id;
        Ok(category.clone())
    }

    async fn deactivate(&self, id: i64) -> Result<Category, RepositoryError> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .filter(|c| c.is_active)
            .ok_or(RepositoryError::NotFound("Category"))?;
        category.is_active = false;
        Ok(category.clone())
    }
}

#[derive(Debug)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<i64, Product>>,
    ids: IdSequence,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_active(&self, category_id: Option<i64>) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut active: Vec<Product> = products
            .values()
            .filter(|p| p.is_active && category_id.map_or(true, |id| p.category_id == id))
            .cloned()
            .collect();
        active.sort_by_key(|p| p.id);
        Ok(active)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id).filter(|p| p.is_active).cloned())
    }

    async fn create(
        &self,
        seller_id: i64,
        product: ProductCreate,
    ) -> Result<Product, RepositoryError> {
        let product = Product {
            id: self.ids.next(),
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            stock: product.stock,
            rating: 0.0,
            category_id: product.category_id,
            seller_id,
            is_active: true,
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, update: ProductCreate) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .filter(|p| p.is_active)
            .ok_or(RepositoryError::NotFound("Product"))?;
        product.name = update.name;
        product.description = update.description;
        product.price = update.price;
        product.image_url = update.image_url;
        product.stock = update.stock;
        product.category_id = update.category_id;
        Ok(product.clone())
    }

    async fn deactivate(&self, id: i64) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .filter(|p| p.is_active)
            .ok_or(RepositoryError::NotFound("Product"))?;
        product.is_active = false;
        Ok(product.clone())
    }

    async fn set_rating(&self, id: i64, rating: f64) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound("Product"))?;
        product.rating = rating;
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<HashMap<i64, Review>>,
    ids: IdSequence,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self {
            reviews: RwLock::new(HashMap::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryReviewRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn list_active(&self, product_id: Option<i64>) -> Result<Vec<Review>, RepositoryError> {
        let reviews = self.reviews.read().await;
        let mut active: Vec<Review> = reviews
            .values()
            .filter(|r| r.is_active && product_id.map_or(true, |id| r.product_id == id))
            .cloned()
            .collect();
        active.sort_by_key(|r| r.id);
        Ok(active)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Review>, RepositoryError> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(&id).filter(|r| r.is_active).cloned())
    }

    async fn create(&self, user_id: i64, review: ReviewCreate) -> Result<Review, RepositoryError> {
        let mut reviews = self.reviews.write().await;
        if reviews
            .values()
            .any(|r| r.user_id == user_id && r.product_id == review.product_id)
        {
            return Err(RepositoryError::Conflict(
                "user already reviewed this product".to_string(),
            ));
        }

        let review = Review {
            id: self.ids.next(),
            user_id,
            product_id: review.product_id,
            comment: review.comment,
            comment_date: Utc::now(),
            grade: review.grade,
            is_active: true,
        };
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn deactivate(&self, id: i64) -> Result<Review, RepositoryError> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&id)
            .filter(|r| r.is_active)
            .ok_or(RepositoryError::NotFound("Review"))?;
        review.is_active = false;
        Ok(review.clone())
    }

    async fn average_grade(&self, product_id: i64) -> Result<f64, RepositoryError> {
        let reviews = self.reviews.read().await;
        let grades: Vec<i32> = reviews
            .values()
            .filter(|r| r.is_active && r.product_id == product_id)
            .map(|r| r.grade)
            .collect();

        if grades.is_empty() {
            return Ok(0.0);
        }
        Ok(grades.iter().map(|&g| f64::from(g)).sum::<f64>() / grades.len() as f64)
    }
}
