pub mod api_client;
pub mod media;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use api_client::{ApiClient, ApiResponse, Headers, Payload};
pub use media::MediaUploader;
pub use session::Session;
pub use transport::{
    HttpMethod, MultipartForm, RequestBody, Transport, TransportRequest, TransportResponse,
    WreqTransport,
};
