pub mod types;
pub mod queries;
pub mod slug;
pub mod view;

pub use types::*;
pub use queries::*;
pub use view::{DisplayDate, ProfileView, SlideView, SlideshowView};
