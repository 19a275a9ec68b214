pub mod command;
pub mod map;
pub mod normalize;
pub mod readiness;
pub mod session;

pub use crate::domain::model::{DebugData, Message, Place, SearchResponse};
pub use crate::domain::ports::{ConfigProvider, SearchBackend};
pub use crate::utils::error::Result;
