//! Infrastructure layer: wire-format DTOs and the registry implementation.

pub mod dto;
pub mod repository;
