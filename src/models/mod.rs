pub mod slide;
pub mod slideshow;
pub mod user;
