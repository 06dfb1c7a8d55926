// src/report/mod.rs
//! The report aggregation layer: conversion resolution plus assembly of
//! flattened, analysis-ready per-ad records.

pub mod assembler;
pub mod conversions;
pub mod records;

pub use assembler::{build_comprehensive, build_summary, ReportRequest, SortKey};
pub use records::{
    FlattenedAdRecord, ReportResult, ReportTotals, SummaryRecord, SummaryReport,
};
