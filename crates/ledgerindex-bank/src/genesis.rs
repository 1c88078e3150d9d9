//! Genesis reconciliation for the bank module.
//!
//! `init_genesis` applies a [`GenesisState`] to a keeper, verifies that the
//! declared supply matches the sum of the balances, and only then records one
//! `genesis_balance` per (address, denom) followed by one `genesis_supply`
//! per denom. A rejected genesis appends nothing.

use std::collections::{BTreeMap, HashSet};

use ledgerindex_core::{BankEvent, Coins, EventSink, ExecutionContext};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::emitter::party;
use crate::error::GenesisError;
use crate::keeper::BankKeeper;
use crate::types::{Balance, BankParams, DenomMetadata, PageRequest, MAX_PAGE_LIMIT};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: BankParams,
    #[serde(default)]
    pub balances: Vec<Balance>,
    /// Declared total supply. Empty means "derive it from the balances".
    #[serde(default)]
    pub supply: Coins,
    #[serde(default)]
    pub denom_metadata: Vec<DenomMetadata>,
}

impl GenesisState {
    pub fn new(
        params: BankParams,
        balances: Vec<Balance>,
        supply: Coins,
        denom_metadata: Vec<DenomMetadata>,
    ) -> Self {
        Self {
            params,
            balances,
            supply,
            denom_metadata,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Stateless checks: params and metadata. Supply is checked against the
    /// balances during [`init_genesis`].
    pub fn validate(&self) -> Result<(), GenesisError> {
        self.params.validate().map_err(GenesisError::InvalidParams)?;

        let mut bases = HashSet::new();
        for metadata in &self.denom_metadata {
            metadata
                .validate()
                .map_err(|reason| GenesisError::InvalidMetadata {
                    base: metadata.base.clone(),
                    reason,
                })?;
            if !bases.insert(metadata.base.as_str()) {
                return Err(GenesisError::InvalidMetadata {
                    base: metadata.base.clone(),
                    reason: "duplicate metadata".into(),
                });
            }
        }
        Ok(())
    }
}

/// Merge balances that share an address and sort by address.
pub fn sanitize_balances(balances: Vec<Balance>) -> Result<Vec<Balance>, GenesisError> {
    let mut merged: BTreeMap<String, Coins> = BTreeMap::new();
    for balance in balances {
        merged
            .entry(balance.address)
            .or_default()
            .add_all(&balance.coins)?;
    }
    Ok(merged
        .into_iter()
        .map(|(address, coins)| Balance::new(address, coins))
        .collect())
}

/// Apply `state` to `keeper` and record the opening balances and supply.
///
/// Returns the computed total supply.
pub fn init_genesis<C, K>(
    ctx: &C,
    keeper: &mut K,
    sink: &EventSink<BankEvent>,
    state: GenesisState,
) -> Result<Coins, GenesisError>
where
    C: ExecutionContext + ?Sized,
    K: BankKeeper + ?Sized,
{
    state.validate()?;
    keeper.set_params(state.params);

    let balances = sanitize_balances(state.balances)?;
    let mut total = Coins::new();
    for balance in &balances {
        keeper
            .init_balances(&balance.address, &balance.coins)
            .map_err(|source| GenesisError::Balance {
                address: balance.address.clone(),
                source,
            })?;
        total.add_all(&balance.coins)?;
    }

    if !state.supply.is_empty() && state.supply != total {
        return Err(GenesisError::SupplyMismatch {
            declared: state.supply,
            computed: total,
        });
    }

    // Every keeper write that can fail happens before the first record.
    for supply in total.iter() {
        keeper
            .set_supply(&supply)
            .map_err(|source| GenesisError::Supply {
                denom: supply.denom.clone(),
                source,
            })?;
    }

    for balance in &balances {
        for coin in balance.coins.iter() {
            let held = keeper.balance(&balance.address, &coin.denom);
            let to = party(&*keeper, &balance.address, held);
            sink.emit(ctx, &BankEvent::genesis_balance(coin, to));
        }
    }

    for supply in total.iter() {
        sink.emit(ctx, &BankEvent::genesis_supply(supply));
    }

    for metadata in state.denom_metadata {
        keeper.set_denom_metadata(metadata);
    }

    info!(
        block_height = ctx.block_height(),
        accounts = balances.len(),
        supply = %total,
        "initialized bank genesis"
    );
    Ok(total)
}

/// Read the keeper's full state back into a [`GenesisState`], walking
/// balances and supply one bounded page at a time.
pub fn export_genesis<K: BankKeeper + ?Sized>(keeper: &K) -> Result<GenesisState, GenesisError> {
    let mut balances = Vec::new();
    let mut page = PageRequest::new(MAX_PAGE_LIMIT);
    loop {
        let (chunk, resp) = keeper
            .paginated_balances(&page)
            .map_err(GenesisError::Export)?;
        balances.extend(chunk);
        match resp.next_key {
            Some(key) => page = page.with_key(key),
            None => break,
        }
    }

    let mut supply = Coins::new();
    let mut page = PageRequest::new(MAX_PAGE_LIMIT);
    loop {
        let (chunk, resp) = keeper
            .paginated_total_supply(&page)
            .map_err(GenesisError::Export)?;
        supply.add_all(&chunk)?;
        match resp.next_key {
            Some(key) => page = page.with_key(key),
            None => break,
        }
    }

    Ok(GenesisState::new(
        keeper.params(),
        balances,
        supply,
        keeper.all_denom_metadata(),
    ))
}
