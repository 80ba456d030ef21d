pub mod combiner;
pub mod engine;
pub mod frequency;
pub mod integration;
pub mod opinion;
pub mod recommendation;
pub mod registry;
pub mod score;
pub mod selector;
pub mod temporal;
pub mod trajectory;

pub use combiner::*;
pub use engine::*;
pub use frequency::*;
pub use integration::*;
pub use opinion::*;
pub use recommendation::*;
pub use registry::*;
pub use score::*;
pub use selector::*;
pub use temporal::*;
pub use trajectory::*;
