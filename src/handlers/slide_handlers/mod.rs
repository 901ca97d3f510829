pub mod actions;
pub mod crud;
pub mod list;
