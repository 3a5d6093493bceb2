pub mod auth;
pub mod contacts;
pub mod meetings;
pub mod posts;
pub mod search;
pub mod survey;
pub mod uploads;

// Re-export all models for easier imports
pub use auth::*;
pub use contacts::*;
pub use meetings::*;
pub use posts::*;
pub use search::*;
pub use survey::*;
pub use uploads::*;
