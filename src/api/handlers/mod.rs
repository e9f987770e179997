pub mod health;
pub mod transcriptions;
