pub mod loader;
pub mod profiles;
pub mod types;

pub use loader::Config;
pub use profiles::{SlimProfile, SlimProfileManager};
pub use types::*;
