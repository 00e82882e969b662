//! # tally-page: Order Page Parser
//!
//! Reads a captured group-order page into the [`OrderData`] model the
//! calculators in `tally-core` work on.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   PageSnapshot ──► PageParser ──► strategy 1: structured blocks        │
//! │                         │          strategy 2: visible text            │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                  sanity checks (participant count, amounts)            │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                     OrderData   or   PageError                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`price`] - euro amounts in page locales
//! - [`fees`] - delivery, service, voucher and tip rows
//! - [`snapshot`] - the captured page
//! - [`strategy`] - the extraction strategies
//! - [`parser`] - runs the strategies and checks the result
//! - [`error`] - page errors
//!
//! [`OrderData`]: tally_core::OrderData

pub mod error;
pub mod fees;
pub mod parser;
pub mod price;
pub mod snapshot;
pub mod strategy;

pub use error::{PageError, PageResult};
pub use fees::FeeKind;
pub use parser::PageParser;
pub use price::{parse_price, split_trailing_price};
pub use snapshot::{FeeRow, PageSnapshot, ParticipantBlock};
pub use strategy::{ExtractionStrategy, StructuredStrategy, TextFallbackStrategy};
