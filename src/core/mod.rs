pub mod builder;

pub use crate::domain::model::{ApplyOutcome, Lifecycle, SecurityGroup};
pub use crate::domain::ports::{ConfigProvider, SecurityGroupApi};
pub use crate::utils::error::Result;
