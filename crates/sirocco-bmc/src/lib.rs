//! Sirocco BMC Fan Control
//!
//! This crate talks to the vendor BMC (Baseboard Management Controller)
//! web API: the three-step session handshake and the fan mode/duty/status
//! endpoints built on top of it.
//!
//! # Example
//!
//! ```no_run
//! use sirocco_bmc::{BmcClient, BmcConfig, FanController, FanMode, FanOps};
//!
//! # async fn example() -> sirocco_bmc::Result<()> {
//! let client = BmcClient::new(BmcConfig::new("10.0.13.1", "admin", "admin"))?;
//!
//! // Challenge fetch plus credential exchange; the returned session is an
//! // immutable value scoped to this one node.
//! let session = client.login().await?;
//!
//! let fans = FanController::new(client, session);
//! fans.set_mode(FanMode::Manual).await?;
//! fans.set_fan_duty(0, 35).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fans;
pub mod session;
pub mod types;

pub use error::{BmcError, Result};
pub use fans::{apply_duty, FanController, FanOps, FanOutcome};
pub use session::{BmcClient, Session};
pub use types::{BmcConfig, FanMode};
