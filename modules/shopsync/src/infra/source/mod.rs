mod rest;

pub use rest::{RestSourceClient, RestSourceFactory};
