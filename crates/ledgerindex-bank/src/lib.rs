//! ledgerindex-bank: bank keeper interface, genesis reconciliation, and the
//! balance/supply emitters that feed the `bank` stream.
//!
//! ```text
//! IndexedBank<K: BankKeeper>
//!      ├── init_genesis   (sanitize → apply → supply check → genesis_* records)
//!      ├── export_genesis (paginated supply, all balances, metadata)
//!      └── send / mint / burn  → keeper mutation → read-back → EventSink<BankEvent>
//! ```

pub mod emitter;
pub mod error;
pub mod genesis;
pub mod keeper;
pub mod memory;
pub mod types;

pub use emitter::IndexedBank;
pub use error::{GenesisError, KeeperError};
pub use genesis::{export_genesis, init_genesis, sanitize_balances, GenesisState};
pub use keeper::BankKeeper;
pub use memory::MemoryBankKeeper;
pub use types::{
    module_address, Balance, BankParams, DenomMetadata, DenomUnit, ModulePermission, PageRequest,
    PageResponse, SendEnabled, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
