//! HTTP plumbing: the transport seam and the retry executor built on it.

pub mod retry;
pub mod transport;

pub use retry::{MAX_RETRIES, execute_with_retry};
pub use transport::{DEFAULT_TIMEOUT, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
