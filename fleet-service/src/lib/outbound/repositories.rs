pub mod address;
pub mod client;
pub mod reset_token;
pub mod user;

pub use address::PostgresAddressRepository;
pub use client::PostgresClientRepository;
pub use reset_token::PostgresResetTokenLedger;
pub use user::PostgresUserRepository;
