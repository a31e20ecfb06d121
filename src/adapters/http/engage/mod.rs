//! HTTP adapter for the engagement endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{EngageRequest, EngageResponse, MessageDto, MetadataDto};
pub use handlers::{health, EngageHandlers};
pub use routes::engage_routes;
