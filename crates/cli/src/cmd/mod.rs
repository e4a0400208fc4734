mod hoist;

pub use hoist::{HoistOptions, cmd_hoist};
