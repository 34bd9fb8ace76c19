//! Host bridge: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the
//! browser side: reading inbound events from the native-messaging port and
//! issuing management/window/tab commands (uninstall, query tabs, close
//! window, create tab). It MUST NOT contain any policy logic about removal
//! eligibility or allowlisting. All blocking decisions are made exclusively
//! by the guards, using Config::should_remove() and Config::is_allowlisted().

mod dry_run;
mod native;
mod protocol;
mod r#trait;

pub use self::r#trait::{create_host_listener, HostListenerTrait, ManagementApi, WindowApi};
