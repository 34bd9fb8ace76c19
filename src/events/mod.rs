pub mod install;
pub mod window;

pub use install::{AppType, InstallEvent, InstallType};
pub use window::{TabRecord, WindowEvent, WindowType};
