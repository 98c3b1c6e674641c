pub mod category_queries;
pub mod collection_queries;
pub mod image_queries;
pub mod product_queries;
pub mod review_queries;
