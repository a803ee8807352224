// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Forecast client library for map-driven weather lookups.
//!
//! A click on a map turns into a rounded [`Coordinate`], a single marker, a
//! loading state and one `GET /predict?lat=..&long=..` request. The layers can
//! be used independently:
//!
//! - **Coordinate layer**: rounding to display precision ([`coord`])
//! - **Protocol layer**: response payloads and validation ([`protocol`])
//! - **HTTP layer**: the [`ForecastApi`] seam and a `reqwest` client ([`http`])
//! - **Handler layer**: marker, UI state and display fields ([`handler`])
//! - **Dispatch layer**: background requests for event-loop hosts ([`dispatch`])
//!
//! # Quick Start
//!
//! ```no_run
//! use forecast_client::{ClientConfig, HttpForecastClient, LogNotifier, MapClickHandler};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = HttpForecastClient::new(&ClientConfig::default()).unwrap();
//!     let mut handler = MapClickHandler::new(LogNotifier);
//!
//!     handler.handle_click(&api, 51.507_351, -0.127_758).await;
//!
//!     if let Some(fields) = handler.display() {
//!         println!("{}: {}°C, {}", fields.coords, fields.temp, fields.location_name);
//!     }
//! }
//! ```
//!
//! # Protocol Layer Only
//!
//! ```
//! use forecast_client::protocol::interpret_response;
//!
//! let err = interpret_response(200, br#"{"error":"no data"}"#).unwrap_err();
//! assert_eq!(err.user_message(), "API Error: no data");
//! ```

pub mod coord;
pub mod dispatch;
pub mod handler;
pub mod http;
pub mod protocol;

pub use coord::{Coordinate, COORDINATE_PRECISION};
pub use dispatch::{Dispatcher, ForecastCompletion};
pub use handler::{
    Completion, DisplayFields, ForecastTicket, HandlerOptions, LogNotifier, MapClickHandler,
    Marker, Notifier, UiState,
};
pub use http::{ClientConfig, ClientError, ForecastApi, HttpForecastClient, DEFAULT_BASE_URL};
pub use protocol::{ForecastError, ForecastResult};
