pub mod errors;
pub mod extract;
pub mod routes;
pub mod openapi;
pub mod startup;

pub use routes::AppState;
pub use startup::run;
