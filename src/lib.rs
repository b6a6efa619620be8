//! Client for a local `/shuffle` microservice: posts `{"unique_nums": n}` and
//! hands back whatever JSON the service answers with.

pub mod endpoint;
pub mod error;
pub mod mock;
pub mod payload;
pub mod sender;
pub mod transport;

pub use endpoint::{DEFAULT_HOST, DEFAULT_PORT, Endpoint, SHUFFLE_PATH, SenderConfig};
pub use error::{NetworkStage, SendError, SendResult};
pub use mock::{MockFailure, MockTransport, MockTransportSnapshot};
pub use payload::{ServiceType, ShuffleRequest, ShuffleResponse};
pub use sender::{ShuffleSender, send_shuffle_request};
pub use transport::{JSON_CONTENT_TYPE, JsonPost, RawReply, ReqwestTransport, Transport};
