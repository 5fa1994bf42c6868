pub mod dynamic;
pub mod fallback;

pub use dynamic::DynamicResolver;
pub use fallback::{FallbackResolver, UpstreamSettings};
