pub mod client;

pub use client::RinsrClient;
