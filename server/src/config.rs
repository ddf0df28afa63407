use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::store::{CorruptStorePolicy, MessageStore};

pub const DEFAULT_PORT: u16 = 3000;

/// Storage directory, relative to the working directory unless absolute.
pub const DEFAULT_DATA_DIR: &str = "data";

/// 100 KiB; a form submission is a few KiB at most.
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub on_corrupt: CorruptStorePolicy,
    /// Reject submissions without a non-blank name, email and message.
    pub require_fields: bool,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            on_corrupt: CorruptStorePolicy::default(),
            require_fields: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn open_store(&self) -> MessageStore {
        MessageStore::new(self.data_dir.clone(), self.on_corrupt)
    }
}
