pub mod commit;
pub mod engine;
mod error;
pub mod position;
pub mod reorder;
pub mod resolver;

pub use commit::commit;
pub use engine::{EventResponse, LayoutEngine, PageScroll};
pub use error::GridError;
pub use position::layout;
pub use reorder::move_tile;
pub use resolver::resolve_index;
