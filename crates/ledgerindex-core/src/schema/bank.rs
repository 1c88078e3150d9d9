//! Balance and supply records (`bank` stream).

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, CoinReading};
use crate::event::{Domain, DomainEvent, EventHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAction {
    /// Initial balance of one entity in one denom.
    GenesisBalance,
    /// Initial total supply of one denom.
    GenesisSupply,
    Transfer,
    Mint,
    Burn,
}

impl BankAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenesisBalance => "genesis_balance",
            Self::GenesisSupply => "genesis_supply",
            Self::Transfer => "transfer",
            Self::Mint => "mint",
            Self::Burn => "burn",
        }
    }
}

/// An account or module account with its balance after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEntity {
    /// Set for module accounts only.
    pub module_name: Option<String>,
    pub address: String,
    pub balance: CoinReading,
}

/// One side of a balance change.
///
/// `None` is the "no counterparty" side (the sender of a genesis credit, the
/// receiver of a burn). On the wire it keeps the legacy shape: empty module
/// name and address, and a `-1` balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EntityWire", try_from = "EntityWire")]
pub enum Party {
    None { denom: String },
    Entity(BankEntity),
}

impl Party {
    pub fn none(denom: impl Into<String>) -> Self {
        Self::None {
            denom: denom.into(),
        }
    }

    pub fn account(address: impl Into<String>, balance: Coin) -> Self {
        Self::Entity(BankEntity {
            module_name: None,
            address: address.into(),
            balance: CoinReading::Known(balance),
        })
    }

    pub fn module(name: impl Into<String>, address: impl Into<String>, balance: Coin) -> Self {
        Self::Entity(BankEntity {
            module_name: Some(name.into()),
            address: address.into(),
            balance: CoinReading::Known(balance),
        })
    }

    pub fn entity(&self) -> Option<&BankEntity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::None { .. } => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.entity().map(|e| e.address.as_str())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityWire {
    module_name: String,
    address: String,
    balance: CoinReading,
}

impl From<Party> for EntityWire {
    fn from(party: Party) -> Self {
        match party {
            Party::None { denom } => EntityWire {
                module_name: String::new(),
                address: String::new(),
                balance: CoinReading::NotApplicable { denom },
            },
            Party::Entity(entity) => EntityWire {
                module_name: entity.module_name.unwrap_or_default(),
                address: entity.address,
                balance: entity.balance,
            },
        }
    }
}

impl TryFrom<EntityWire> for Party {
    type Error = String;

    fn try_from(wire: EntityWire) -> Result<Self, Self::Error> {
        if wire.module_name.is_empty() && wire.address.is_empty() {
            return match wire.balance {
                CoinReading::NotApplicable { denom } => Ok(Party::None { denom }),
                CoinReading::Known(coin) => {
                    Err(format!("entity without address carries balance {coin}"))
                }
            };
        }
        Ok(Party::Entity(BankEntity {
            module_name: (!wire.module_name.is_empty()).then_some(wire.module_name),
            address: wire.address,
            balance: wire.balance,
        }))
    }
}

/// A balance or supply change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankEvent {
    pub action: BankAction,
    /// Amount moved, credited, minted or burned.
    pub coin: Coin,
    pub from: Party,
    pub to: Party,
    /// Supply of `coin.denom` after the change, when the change affects supply.
    pub new_supply: CoinReading,
}

impl BankEvent {
    /// Genesis credit of `coin` to `to`.
    pub fn genesis_balance(coin: Coin, to: Party) -> Self {
        let denom = coin.denom.clone();
        Self {
            action: BankAction::GenesisBalance,
            from: Party::none(denom.clone()),
            to,
            new_supply: CoinReading::not_applicable(denom),
            coin,
        }
    }

    /// Genesis total supply of one denom.
    pub fn genesis_supply(supply: Coin) -> Self {
        let denom = supply.denom.clone();
        Self {
            action: BankAction::GenesisSupply,
            from: Party::none(denom.clone()),
            to: Party::none(denom),
            new_supply: CoinReading::Known(supply.clone()),
            coin: supply,
        }
    }

    pub fn transfer(coin: Coin, from: Party, to: Party) -> Self {
        let denom = coin.denom.clone();
        Self {
            action: BankAction::Transfer,
            coin,
            from,
            to,
            new_supply: CoinReading::not_applicable(denom),
        }
    }

    pub fn mint(coin: Coin, to: Party, new_supply: Coin) -> Self {
        let denom = coin.denom.clone();
        Self {
            action: BankAction::Mint,
            coin,
            from: Party::none(denom),
            to,
            new_supply: CoinReading::Known(new_supply),
        }
    }

    pub fn burn(coin: Coin, from: Party, new_supply: Coin) -> Self {
        let denom = coin.denom.clone();
        Self {
            action: BankAction::Burn,
            coin,
            from,
            to: Party::none(denom),
            new_supply: CoinReading::Known(new_supply),
        }
    }
}

impl DomainEvent for BankEvent {
    const DOMAIN: Domain = Domain::Bank;
    type Header = EventHeader;

    fn action(&self) -> &'static str {
        self.action.as_str()
    }
}
