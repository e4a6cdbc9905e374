//! Adapters implementing application ports

mod departure_adapter;

pub use departure_adapter::AtbDepartureAdapter;
