pub mod arbiter;
pub mod gateway;
pub(crate) mod http;
pub mod storage;
pub mod traffic_transport;

pub use arbiter::HttpArbiterClient;
pub use gateway::HttpGatewayClient;
pub use traffic_transport::HttpTrafficTransport;
