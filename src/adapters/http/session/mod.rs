//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CancelResponse, ErrorResponse, MessageResponse, OfferResponse, ReplyRequest, RunStatus,
    SessionResponse, StartSessionRequest,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
