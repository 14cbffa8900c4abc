//! Postgres-backed repositories

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    Category, CategoryCreate, Product, ProductCreate, Review, ReviewCreate, User, UserRole,
};

use super::{
    CategoryRepository, NewUser, ProductRepository, RepositoryError, ReviewRepository,
    UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    db_pool: PgPool,
}

impl PgUserRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_active_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, is_active, role
            FROM users
            WHERE email = $1 AND is_active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn find_active_user_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, is_active, role
            FROM users
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.db_pool)
                .await?;

        Ok(exists)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, hashed_password, is_active, role
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(new_user.role)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn update_user_role(&self, id: i64, role: UserRole) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $1
            WHERE id = $2 AND is_active = TRUE
            RETURNING id, email, hashed_password, is_active, role
            "#,
        )
        .bind(role)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("User"))
    }

    async fn deactivate_user(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = FALSE
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, email, hashed_password, is_active, role
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("User"))
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    db_pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_active(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, is_active
            FROM categories
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(categories)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, is_active
            FROM categories
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(category)
    }

    async fn create(&self, category: CategoryCreate) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, parent_id)
            VALUES ($1, $2)
            RETURNING id, name, parent_id, is_active
            "#,
        )
        .bind(&category.name)
        .bind(category.parent_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(category)
    }

    async fn update(
        &self,
        id: i64,
        category: CategoryCreate,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, parent_id = $2
            WHERE id = $3 AND is_active = TRUE
            RETURNING id, name, parent_id, is_active
            "#,
        )
        .bind(&category.name)
        .bind(category.parent_id)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("Category"))
    }

    async fn deactivate(&self, id: i64) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET is_active = FALSE
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, name, parent_id, is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("Category"))
    }
}

#[derive(Clone)]
pub struct PgProductRepository {
    db_pool: PgPool,
}

impl PgProductRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_active(&self, category_id: Option<i64>) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, image_url, stock, rating, category_id, seller_id,
                   is_active
            FROM products
            WHERE is_active = TRUE AND ($1::BIGINT IS NULL OR category_id = $1)
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(products)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, image_url, stock, rating, category_id, seller_id,
                   is_active
            FROM products
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(product)
    }

    async fn create(
        &self,
        seller_id: i64,
        product: ProductCreate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, image_url, stock, category_id, seller_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price, image_url, stock, rating, category_id, seller_id,
                      is_active
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(seller_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, id: i64, product: ProductCreate) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, image_url = $4, stock = $5,
                category_id = $6
            WHERE id = $7 AND is_active = TRUE
            RETURNING id, name, description, price, image_url, stock, rating, category_id, seller_id,
                      is_active
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("Product"))
    }

    async fn deactivate(&self, id: i64) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET is_active = FALSE
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, name, description, price, image_url, stock, rating, category_id, seller_id,
                      is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("Product"))
    }

    async fn set_rating(&self, id: i64, rating: f64) -> Result<(), RepositoryError> {
        sqlx::query(r#"UPDATE products SET rating = $1 WHERE id = $2"#)
            .bind(rating)
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgReviewRepository {
    db_pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list_active(&self, product_id: Option<i64>) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, product_id, comment, comment_date, grade, is_active
            FROM reviews
            WHERE is_active = TRUE AND ($1::BIGINT IS NULL OR product_id = $1)
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(reviews)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, product_id, comment, comment_date, grade, is_active
            FROM reviews
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(review)
    }

    async fn create(&self, user_id: i64, review: ReviewCreate) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, product_id, comment, grade)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product_id, comment, comment_date, grade, is_active
            "#,
        )
        .bind(user_id)
        .bind(review.product_id)
        .bind(&review.comment)
        .bind(review.grade)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(review)
    }

    async fn deactivate(&self, id: i64) -> Result<Review, RepositoryError> {
        sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET is_active = FALSE
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, user_id, product_id, comment, comment_date, grade, is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound("Review"))
    }

    async fn average_grade(&self, product_id: i64) -> Result<f64, RepositoryError> {
        let average: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(grade)::DOUBLE PRECISION
            FROM reviews
            WHERE product_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(average.unwrap_or(0.0))
    }
}
