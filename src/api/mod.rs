//! Boundary shapes for HTTP controllers: list query parameters and the
//! error envelope. List responses are [`Paginated`](crate::domain::Paginated)
//! serialized as `{ data, pagination }`.

pub mod error;
pub mod params;

pub use error::{ErrorBody, ErrorEnvelope};
pub use params::ListParams;
