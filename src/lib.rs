#![warn(missing_docs)]
//! Библиотека для разбора текстовых выгрузок заказов и расчёта сводных показателей.

mod aggregate;
mod error;
mod parser;
mod raw;
mod report;
mod store;
mod types;
mod utils;

pub use crate::aggregate::{progress, top_n};
pub use crate::error::ReportError;
pub use crate::raw::RawReport;
pub use crate::report::parse;
pub use crate::store::{AccumulationStore, IngestedReport, Selection, StoredRecord};
pub use crate::types::*;
