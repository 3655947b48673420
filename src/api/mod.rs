//! Backend API
//!
//! Typed client for the scoreboard and scheduler REST backend.
//!
//! # Endpoints
//!
//! ## Authentication
//! - `POST login` - Exchange a speedrun.com API key for a token
//! - `GET users/current` - Authenticated user
//!
//! ## Scheduler
//! - `GET schedules` - Schedules of the current user
//! - `GET schedules/:id[?registrationKey=]` - One schedule
//! - `POST schedules` - Create, answers with the new id
//! - `PUT schedules/:id` - Update
//! - `DELETE schedules/:id` - Delete
//! - `POST time-slots/:id/registrations` - Register (404/507 on failure)
//! - `PUT registrations/:id` - Update participants
//! - `DELETE registrations/:id` - Delete
//!
//! ## Scoreboard
//! - `GET players` - Player list
//! - `GET players/current/friends` - Friend ids of the current player
//! - `PUT players/current/friends/:id` - Add a friend (422 for yourself)
//! - `DELETE players/current/friends/:id` - Remove a friend
//! - `POST players/:name_or_id/update` - Trigger an update
//!
//! # Example
//!
//! ```rust,ignore
//! use runboard::api::{ApiClient, ApiClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ApiClient::new(ApiClientConfig::default())?;
//!     client.login("my-src-api-key").await?;
//!
//!     for schedule in client.list_schedules().await? {
//!         println!("{} {}", schedule.id, schedule.name);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{ApiClient, ApiClientConfig, LoginResponse, REQUEST_ID_HEADER};
pub use error::{ApiError, ApiResult, GENERIC_USER_MESSAGE};
