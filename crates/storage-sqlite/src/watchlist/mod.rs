mod model;
mod repository;

pub use model::WatchlistDB;
pub use repository::WatchlistRepository;
