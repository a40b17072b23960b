//! Core data models for book search results and vendor candidate records.

mod book;
mod candidate;

pub use book::{BookResult, BookResultBuilder, SearchMode};
pub use candidate::{CandidateRecord, ImageLinks, IndustryIdentifier, VolumeInfo, VolumesResponse};
