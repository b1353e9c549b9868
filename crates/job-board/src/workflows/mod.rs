pub mod moderation;
pub mod notifications;
pub mod operations;
pub mod reports;
pub mod session;
pub mod settings;
