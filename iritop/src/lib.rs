pub mod dashboard;
pub mod node;
pub mod obscure;
pub mod state;
pub mod view;

mod error;

pub use dashboard::Dashboard;
pub use error::Error;
pub use node::{HttpNodeApi, NodeApi};
