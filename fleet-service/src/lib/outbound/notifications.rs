pub mod smtp;

pub use smtp::SmtpResetNotifier;
