pub mod client;
pub mod effect;
pub mod form;
pub mod response;
pub mod scrape;
pub mod session;
pub mod transport;
