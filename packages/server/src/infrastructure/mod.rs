//! Infrastructure layer: DTOs, message stores and the live session hub.

pub mod dto;
pub mod hub;
pub mod repository;
