//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Mutations that touch more
//! than one row run inside a single transaction.

pub mod category_repo;
pub mod color_repo;
pub mod image_repo;
pub mod overview_repo;
pub mod product_repo;
pub mod stock_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use color_repo::ColorRepo;
pub use image_repo::ImageRepo;
pub use overview_repo::OverviewRepo;
pub use product_repo::ProductRepo;
pub use stock_repo::StockRepo;
pub use user_repo::UserRepo;
