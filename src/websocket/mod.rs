//! WebSocket transport: the axum upgrade handler, the per-connection send/
//! receive tasks, and the route table (including the REST surface).

pub mod connection;
pub mod handler;
pub mod routes;

pub use routes::create_router;
