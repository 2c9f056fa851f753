pub mod admin_dto;
pub mod admin_handlers;
pub mod admin_middleware;
pub mod routes;

pub use admin_dto::AdminOverviewResponse;
pub use admin_middleware::admin_authorization;
