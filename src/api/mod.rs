pub mod middleware;
pub mod models;
pub mod models_ws;
pub mod routes;
pub mod routes_ai;
pub mod websocket;
