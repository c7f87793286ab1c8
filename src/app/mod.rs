pub mod dispatch;
pub mod review;
pub mod status;

pub use dispatch::{build_controller, dispatch};
