//! Repositories over the database client

pub mod push_token;

pub use push_token::SqlTokenRepository;
