pub use self::{blob::*, config::*, network::*, pipeline::*};

mod blob;
mod config;
mod network;
mod pipeline;
