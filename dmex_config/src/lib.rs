//! Configuration for the dmex pipeline: note location, intake API settings and
//! the device list consumed by the extraction engine.

mod schema;

pub use schema::{
    CONFIG_TEMPLATE, Config, ENV_API_ENDPOINT, ENV_API_TIMEOUT_SECS, ENV_NOTE_PATH,
};
