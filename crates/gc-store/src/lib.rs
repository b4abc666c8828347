pub mod config;
pub mod error;
pub mod profile;
pub mod schema;
pub mod store;

pub use config::{CONFIG_FILE, load_config};
pub use error::{Result, StoreError};
pub use profile::{DEFAULT_PROFILE, ProfileStore, default_base_dir};
pub use store::Store;
