// Core quiz rules: question validation, the quiz lifecycle and grading.
// Everything in here is pure and synchronous; persistence and HTTP live
// in the `db` and `handlers` modules and call into this one.

pub mod error;
pub mod question;
pub mod quiz;
pub mod scoring;

pub use error::DomainError;
