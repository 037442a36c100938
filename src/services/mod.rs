pub mod dispatcher;
pub mod fetch_service;

pub use dispatcher::FetchDispatcher;
pub use fetch_service::{FetchOutcome, FetchRequest, FetchService, FetchTarget, FetchTicket, Fetched};
