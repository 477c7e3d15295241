//! Cross-chain post replication.
//!
//! A chain running this module can send a post to a counterparty chain over
//! an established channel. The counterparty stores it and acknowledges it
//! with the id it was stored under; the sender then records either a sent
//! post (positive acknowledgement), nothing (error acknowledgement), or a
//! timed-out post (the packet expired).
//!
//! - [`PostKeeper`] -- the four packet operations plus queries and genesis
//! - [`PostModule`] -- transport-facing callbacks over raw packet bytes
//! - [`LoopbackRelayer`] -- in-process relay between two simulated chains
//!
//! # Quick Start
//!
//! ```rust
//! use xpost_module::{LoopbackRelayer, ModuleConfig, SimulatedChain};
//! use xpost_types::{Height, Ordering, PostPayload};
//!
//! let mars = SimulatedChain::new("mars", ModuleConfig::default());
//! let venus = SimulatedChain::new("venus", ModuleConfig::default());
//! let link = LoopbackRelayer::connect(&mars, &venus, Ordering::Unordered).unwrap();
//!
//! let payload = PostPayload::new("alice", "Hello", "from mars");
//! mars.keeper()
//!     .transmit_post(&payload, &link.a_port, &link.a_channel, Height::new(0, 100), 0)
//!     .unwrap();
//! link.relay(&mars, &venus).unwrap();
//!
//! assert_eq!(venus.keeper().posts().unwrap()[0].creator, "blog-channel-0-alice");
//! assert_eq!(mars.keeper().sent_posts().unwrap().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod genesis;
pub mod hooks;
pub mod keeper;
pub mod module;
pub mod msg;
pub mod relay;

pub use config::ModuleConfig;
pub use error::{PostError, PostResult};
pub use genesis::GenesisState;
pub use hooks::{AckObserver, TracingAckObserver};
pub use keeper::{PostKeeper, PostStores};
pub use module::PostModule;
pub use msg::MsgSendIbcPost;
pub use relay::{LoopbackRelayer, RelayReport, SimulatedChain};
