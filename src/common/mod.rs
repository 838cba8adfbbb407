pub mod command_utils;
pub mod secret;

pub use command_utils::{run_captured, CommandOutput};
pub use secret::{expand_home, mask_secret};
