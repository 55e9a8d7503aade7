pub mod categories;
pub mod loader;
pub mod normalize;

pub use categories::Categories;
pub use loader::{Corpus, CorpusItem, CorpusLoader};
pub use normalize::normalize_line;
