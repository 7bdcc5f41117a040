pub mod config;
pub mod controller;
pub mod error;
pub mod remote;
pub mod state;
pub mod view;

pub use controller::{
  Surface,
  SyncController
};
pub use error::ClientError;
pub use remote::TaskRemote;
pub use state::Filter;
pub use view::ViewModel;
