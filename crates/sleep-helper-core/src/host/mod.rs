mod host_handle;
mod media_command;
mod media_host;

pub use {
    host_handle::HostHandle,
    media_command::{MediaCommand, Reply},
    media_host::MediaHost,
};
