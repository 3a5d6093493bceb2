//! Application services. Handlers stay thin; the rules live here.

pub mod accounts;
pub mod meetings;
pub mod posts;
pub mod surveys;
