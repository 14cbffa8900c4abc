//! Business services for catalog resources

pub mod categories;
pub mod products;
pub mod reviews;

pub use categories::CategoryService;
pub use products::ProductService;
pub use reviews::ReviewService;
