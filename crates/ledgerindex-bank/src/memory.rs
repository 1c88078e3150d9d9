//! In-memory bank keeper, used by tests and embedders without a real store.

use std::collections::BTreeMap;

use ledgerindex_core::{Coin, Coins};

use crate::error::KeeperError;
use crate::keeper::BankKeeper;
use crate::types::{
    module_address, Balance, BankParams, DenomMetadata, ModulePermission, PageRequest,
    PageResponse,
};

const MAX_ADDRESS_LEN: usize = 255;

#[derive(Debug, Clone)]
struct ModuleAccount {
    address: String,
    permissions: Vec<ModulePermission>,
}

/// Bank state held in ordered maps, so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryBankKeeper {
    params: BankParams,
    balances: BTreeMap<String, Coins>,
    supply: Coins,
    denom_metadata: BTreeMap<String, DenomMetadata>,
    modules: BTreeMap<String, ModuleAccount>,
}

impl MemoryBankKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: &str, permissions: &[ModulePermission]) -> Self {
        self.register_module(name, permissions);
        self
    }

    /// Register a module account. Re-registering replaces its permissions.
    pub fn register_module(&mut self, name: &str, permissions: &[ModulePermission]) {
        self.modules.insert(
            name.to_string(),
            ModuleAccount {
                address: module_address(name),
                permissions: permissions.to_vec(),
            },
        );
    }

    /// Total supply, all denoms.
    pub fn total_supply(&self) -> &Coins {
        &self.supply
    }

    /// All coins held by `address`.
    pub fn balances_of(&self, address: &str) -> Coins {
        self.balances.get(address).cloned().unwrap_or_default()
    }

    fn module(&self, name: &str) -> Result<&ModuleAccount, KeeperError> {
        self.modules
            .get(name)
            .ok_or_else(|| KeeperError::UnknownModule(name.to_string()))
    }

    fn require(&self, name: &str, permission: ModulePermission) -> Result<String, KeeperError> {
        let module = self.module(name)?;
        if !module.permissions.contains(&permission) {
            return Err(KeeperError::Unauthorized {
                module: name.to_string(),
                permission,
            });
        }
        Ok(module.address.clone())
    }

    fn store(&mut self, address: &str, coins: Coins) {
        if coins.is_empty() {
            self.balances.remove(address);
        } else {
            self.balances.insert(address.to_string(), coins);
        }
    }

    fn debited(&self, address: &str, amount: &Coins) -> Result<Coins, KeeperError> {
        let mut balance = self.balances_of(address);
        for coin in amount.iter() {
            balance
                .checked_sub(&coin)
                .map_err(|source| KeeperError::InsufficientFunds {
                    address: address.to_string(),
                    source,
                })?;
        }
        Ok(balance)
    }
}

fn validate_address(address: &str) -> Result<(), KeeperError> {
    let valid = !address.is_empty()
        && address.len() <= MAX_ADDRESS_LEN
        && address.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(KeeperError::InvalidAddress(address.to_string()))
    }
}

/// Key-ordered paging over `(key, item)` pairs: start at `page.key`, take up
/// to the effective limit, and report the key that follows.
fn paginate<T>(
    entries: impl Iterator<Item = (String, T)>,
    total: usize,
    page: &PageRequest,
) -> Result<(Vec<T>, PageResponse), KeeperError> {
    if page.key.as_deref() == Some("") {
        return Err(KeeperError::InvalidPage("empty page key".into()));
    }
    let limit = page.effective_limit() as usize;
    let mut remaining = entries.skip_while(|(key, _)| {
        page.key
            .as_deref()
            .is_some_and(|start| key.as_str() < start)
    });
    let items = remaining.by_ref().take(limit).map(|(_, item)| item).collect();
    let next_key = remaining.next().map(|(key, _)| key);
    Ok((
        items,
        PageResponse {
            next_key,
            total: total as u64,
        },
    ))
}

impl BankKeeper for MemoryBankKeeper {
    fn params(&self) -> BankParams {
        self.params.clone()
    }

    fn set_params(&mut self, params: BankParams) {
        self.params = params;
    }

    fn init_balances(&mut self, address: &str, coins: &Coins) -> Result<(), KeeperError> {
        validate_address(address)?;
        let mut balance = self.balances_of(address);
        for coin in coins.iter() {
            balance.set(&coin)?;
        }
        self.store(address, balance);
        Ok(())
    }

    fn balance(&self, address: &str, denom: &str) -> Coin {
        let amount = self
            .balances
            .get(address)
            .map(|coins| coins.amount_of(denom))
            .unwrap_or(0);
        Coin::new(denom, amount)
    }

    fn all_balances(&self) -> Vec<Balance> {
        self.balances
            .iter()
            .map(|(address, coins)| Balance::new(address.clone(), coins.clone()))
            .collect()
    }

    fn paginated_balances(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<Balance>, PageResponse), KeeperError> {
        let entries = self.balances.iter().map(|(address, coins)| {
            let balance = Balance::new(address.clone(), coins.clone());
            (address.clone(), balance)
        });
        paginate(entries, self.balances.len(), page)
    }

    fn supply_of(&self, denom: &str) -> Coin {
        Coin::new(denom, self.supply.amount_of(denom))
    }

    fn set_supply(&mut self, supply: &Coin) -> Result<(), KeeperError> {
        self.supply.set(supply)?;
        Ok(())
    }

    fn paginated_total_supply(
        &self,
        page: &PageRequest,
    ) -> Result<(Coins, PageResponse), KeeperError> {
        let entries = self.supply.iter().map(|coin| (coin.denom.clone(), coin));
        let (coins, resp) = paginate(entries, self.supply.len(), page)?;
        Ok((Coins::from_coins(coins)?, resp))
    }

    fn set_denom_metadata(&mut self, metadata: DenomMetadata) {
        self.denom_metadata.insert(metadata.base.clone(), metadata);
    }

    fn all_denom_metadata(&self) -> Vec<DenomMetadata> {
        self.denom_metadata.values().cloned().collect()
    }

    fn module_address(&self, name: &str) -> Option<String> {
        self.modules.get(name).map(|m| m.address.clone())
    }

    fn module_for_address(&self, address: &str) -> Option<String> {
        self.modules
            .iter()
            .find(|(_, m)| m.address == address)
            .map(|(name, _)| name.clone())
    }

    fn send_coins(&mut self, from: &str, to: &str, amount: &Coins) -> Result<(), KeeperError> {
        validate_address(from)?;
        validate_address(to)?;
        if let Some(denom) = amount.denoms().find(|d| !self.params.is_send_enabled(d)) {
            return Err(KeeperError::SendDisabled {
                denom: denom.to_string(),
            });
        }

        let debited = self.debited(from, amount)?;
        let mut credited = if from == to {
            debited.clone()
        } else {
            self.balances_of(to)
        };
        credited.add_all(amount)?;

        self.store(from, debited);
        self.store(to, credited);
        Ok(())
    }

    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), KeeperError> {
        let address = self.require(module, ModulePermission::Minter)?;
        let mut supply = self.supply.clone();
        supply.add_all(amount)?;
        let mut balance = self.balances_of(&address);
        balance.add_all(amount)?;

        self.supply = supply;
        self.store(&address, balance);
        Ok(())
    }

    fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), KeeperError> {
        let address = self.require(module, ModulePermission::Burner)?;
        let balance = self.debited(&address, amount)?;
        let mut supply = self.supply.clone();
        for coin in amount.iter() {
            supply.checked_sub(&coin)?;
        }

        self.supply = supply;
        self.store(&address, balance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn funded() -> MemoryBankKeeper {
        let mut keeper = MemoryBankKeeper::new()
            .with_module("mint", &[ModulePermission::Minter])
            .with_module("burn", &[ModulePermission::Burner]);
        keeper.init_balances("alice", &coins("100atom,5stake")).unwrap();
        keeper.set_supply(&Coin::new("atom", 100)).unwrap();
        keeper.set_supply(&Coin::new("stake", 5)).unwrap();
        keeper
    }

    #[test]
    fn send_moves_funds() {
        let mut keeper = funded();
        keeper.send_coins("alice", "bob", &coins("40atom")).unwrap();
        assert_eq!(keeper.balance("alice", "atom").amount, 60);
        assert_eq!(keeper.balance("bob", "atom").amount, 40);
    }

    #[test]
    fn send_to_self_is_a_no_op() {
        let mut keeper = funded();
        keeper.send_coins("alice", "alice", &coins("40atom")).unwrap();
        assert_eq!(keeper.balance("alice", "atom").amount, 100);
    }

    #[test]
    fn overdraft_leaves_state_untouched() {
        let mut keeper = funded();
        let err = keeper
            .send_coins("alice", "bob", &coins("10atom,6stake"))
            .unwrap_err();
        assert!(matches!(err, KeeperError::InsufficientFunds { .. }));
        assert_eq!(keeper.balances_of("alice"), coins("100atom,5stake"));
        assert!(keeper.balances_of("bob").is_empty());
    }

    #[test]
    fn disabled_denom_cannot_move() {
        let mut keeper = funded();
        let mut params = keeper.params();
        params.default_send_enabled = false;
        keeper.set_params(params);
        let err = keeper.send_coins("alice", "bob", &coins("1atom")).unwrap_err();
        assert_eq!(err, KeeperError::SendDisabled { denom: "atom".into() });
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut keeper = funded();
        keeper.mint_coins("mint", &coins("50atom")).unwrap();
        assert_eq!(keeper.supply_of("atom").amount, 150);

        let mint_addr = keeper.module_address("mint").unwrap();
        let burn_addr = keeper.module_address("burn").unwrap();
        keeper.send_coins(&mint_addr, &burn_addr, &coins("20atom")).unwrap();
        keeper.burn_coins("burn", &coins("20atom")).unwrap();
        assert_eq!(keeper.supply_of("atom").amount, 130);
        assert_eq!(keeper.balance(&burn_addr, "atom").amount, 0);
    }

    #[test]
    fn module_permissions_are_enforced() {
        let mut keeper = funded();
        let err = keeper.mint_coins("burn", &coins("1atom")).unwrap_err();
        assert!(matches!(
            err,
            KeeperError::Unauthorized {
                permission: ModulePermission::Minter,
                ..
            }
        ));
        let err = keeper.burn_coins("nobody", &coins("1atom")).unwrap_err();
        assert_eq!(err, KeeperError::UnknownModule("nobody".into()));
    }

    #[test]
    fn supply_pages_cover_every_denom() {
        let mut keeper = MemoryBankKeeper::new();
        for denom in ["aaa", "bbb", "ccc", "ddd", "eee"] {
            keeper.set_supply(&Coin::new(denom, 1)).unwrap();
        }

        let (first, resp) = keeper.paginated_total_supply(&PageRequest::new(2)).unwrap();
        assert_eq!(first, coins("1aaa,1bbb"));
        assert_eq!(resp.next_key.as_deref(), Some("ccc"));
        assert_eq!(resp.total, 5);

        let (last, resp) = keeper
            .paginated_total_supply(&PageRequest::new(3).with_key("ccc"))
            .unwrap();
        assert_eq!(last, coins("1ccc,1ddd,1eee"));
        assert_eq!(resp.next_key, None);
    }

    #[test]
    fn balance_pages_follow_address_order() {
        let mut keeper = MemoryBankKeeper::new();
        for address in ["carol", "alice", "bob"] {
            keeper.init_balances(address, &coins("1atom")).unwrap();
        }
        let (page, resp) = keeper.paginated_balances(&PageRequest::new(2)).unwrap();
        let names: Vec<_> = page.iter().map(|b| b.address.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
        assert_eq!(resp.next_key.as_deref(), Some("carol"));

        let err = keeper
            .paginated_balances(&PageRequest::new(2).with_key(""))
            .unwrap_err();
        assert!(matches!(err, KeeperError::InvalidPage(_)));
    }

    #[test]
    fn empty_balances_are_not_listed() {
        let mut keeper = funded();
        keeper.send_coins("alice", "bob", &coins("100atom,5stake")).unwrap();
        let listed: Vec<_> = keeper.all_balances().into_iter().map(|b| b.address).collect();
        assert_eq!(listed, vec!["bob".to_string()]);
    }
}
