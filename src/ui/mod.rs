//! Local user interface - one button in, one status LED out.
//!
//! ## Components
//!
//! - **Button**: active-low tactile switch with debouncing; held = sleep
//!   command, or remote wakeup while the host is suspended
//! - **LED**: USB status indication (see `serial_remote::status`)

pub mod buttons;
pub mod led;
