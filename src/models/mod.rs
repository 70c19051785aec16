//! Domain models

pub mod email;
pub mod quote;

pub use email::{EmailSettings, EmailTemplate, OutboxEntry, OutboxStatus};
pub use quote::{CleaningFormType, CleaningQuote, NewQuote, QuoteRow, QuoteStatus};
