pub mod error;
pub mod mapper;
pub mod model;
pub mod ports;
pub mod service;
