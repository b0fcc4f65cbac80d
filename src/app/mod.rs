pub mod reconcile;

pub use reconcile::{execute, Action, ActionResult};
