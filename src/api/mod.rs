pub mod client;
pub mod folders;
pub mod messages;

pub use client::MailApiClient;
