pub mod client;
pub mod types;

pub use client::{HttpTransport, Transport};
pub use types::{
    FieldValue, FilePart, HttpMethod, RequestBody, TransportError, TransportRequest,
    TransportResponse,
};
