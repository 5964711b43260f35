pub mod assistant;
pub mod generator;
pub mod location;
pub mod movies;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod title_search;
pub mod weather;

pub use assistant::Assistant;
pub use generator::RecommendationGenerator;
pub use location::LocationResolver;
pub use movies::{MovieEnricher, MovieIdentityResolver};
pub use recommendations::RecommendationService;
pub use title_search::TitleSearcher;
pub use weather::WeatherResolver;
