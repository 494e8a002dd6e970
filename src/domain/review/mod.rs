pub mod model;
pub mod repository;

pub use model::{mean_rating, validate_rating, NewReview, Review};
pub use repository::ReviewRepository;
