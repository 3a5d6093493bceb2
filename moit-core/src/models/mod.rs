pub mod contact;
pub mod meeting;
pub mod post;
pub mod survey;
pub mod user;

// Re-export all models for easier imports
pub use contact::*;
pub use meeting::*;
pub use post::*;
pub use survey::*;
pub use user::*;
