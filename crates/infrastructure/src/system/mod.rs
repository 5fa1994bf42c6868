pub mod resolv_conf;
pub mod resolv_conf_reload;

pub use resolv_conf::{load_upstream_settings, ResolvConf, DEFAULT_NAMESERVER};
pub use resolv_conf_reload::ResolvConfReloadJob;
