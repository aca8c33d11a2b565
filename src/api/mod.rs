//! Client-side surface of the Tether service API.
//!
//! The transport is the only component that knows about HTTP; everything
//! above it works with [`types::ApiRequest`]/[`types::ApiResponse`] so the
//! offline queue can replay requests through the same path they first took.

pub mod credentials;
pub mod gateway;
pub mod resources;
pub mod transport;
pub mod types;

pub use credentials::{ConfigCredentials, CredentialStore};
pub use gateway::{ApiGateway, Dispatch};
pub use resources::ResourceClient;
pub use transport::{HttpTransport, Transport};
pub use types::{ApiRequest, ApiResponse, Contact, Habit, Method, NewTask, Project, Task};
