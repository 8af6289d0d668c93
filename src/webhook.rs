pub mod api;
pub mod dto;
