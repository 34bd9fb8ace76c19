pub mod install_guard;
pub mod window_guard;

pub use install_guard::InstallGuard;
pub use window_guard::WindowGuard;
