pub mod staging;
pub mod store;
pub mod transcriber;
pub mod transcription;
