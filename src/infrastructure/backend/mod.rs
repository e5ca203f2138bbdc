//! Backend adapters

mod http_client;

pub use http_client::{VocaworkClient, MAX_UPLOAD_BYTES};
