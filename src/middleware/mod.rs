pub mod request_id;
pub mod request_logger;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdExt, request_id_middleware};
pub use request_logger::request_response_logger;
