pub mod forwarding;
pub mod listener;
pub mod load_balancer;
pub mod resolver;
pub mod server;
pub mod transport;

pub use listener::DnsServer;
pub use load_balancer::FailoverStrategy;
pub use resolver::{DynamicResolver, FallbackResolver, UpstreamSettings};
pub use server::DnsServerHandler;
