//! Genesis reconciliation against a real on-disk `bank` stream.

use std::fs;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ledgerindex_bank::{
    export_genesis, init_genesis, Balance, BankKeeper, GenesisError, GenesisState,
    IndexedBank, MemoryBankKeeper, ModulePermission,
};
use ledgerindex_core::{BankEvent, BlockContext, Coins, EventSink, IndexerConfig};
use serde_json::Value;

fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

fn genesis_ctx() -> BlockContext {
    BlockContext::genesis(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

fn records(sink: &EventSink<BankEvent>) -> Vec<Value> {
    fs::read_to_string(sink.path())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn open_sink(home: &tempfile::TempDir) -> EventSink<BankEvent> {
    EventSink::open(&IndexerConfig::new(home.path())).unwrap()
}

#[test]
fn two_holders_produce_balances_then_supply() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![
            Balance::new("A", coins("100atom")),
            Balance::new("B", coins("50atom")),
        ],
        supply: coins("150atom"),
        ..Default::default()
    };

    let total = init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap();
    assert_eq!(total, coins("150atom"));
    assert_eq!(keeper.supply_of("atom").amount, 150);

    let lines = records(&sink);
    assert_eq!(lines.len(), 3);

    let actions: Vec<_> = lines.iter().map(|r| r["action"].as_str().unwrap()).collect();
    assert_eq!(actions, ["genesis_balance", "genesis_balance", "genesis_supply"]);

    let first = &lines[0];
    assert_eq!(first["blockHeight"], 0);
    assert_eq!(first["blockTimeUnixMicro"], 1_709_294_400_000_000_i64);
    assert_eq!(first["coin"]["amount"], "100");
    assert_eq!(first["from"]["address"], "");
    assert_eq!(first["from"]["balance"]["amount"], "-1");
    assert_eq!(first["to"]["address"], "A");
    assert_eq!(first["to"]["balance"]["amount"], "100");
    assert_eq!(first["newSupply"]["amount"], "-1");

    assert_eq!(lines[1]["to"]["address"], "B");
    assert_eq!(lines[1]["to"]["balance"]["amount"], "50");

    let supply = &lines[2];
    assert_eq!(supply["coin"]["amount"], "150");
    assert_eq!(supply["from"]["balance"]["amount"], "-1");
    assert_eq!(supply["to"]["balance"]["amount"], "-1");
    assert_eq!(supply["newSupply"]["amount"], "150");
}

#[test]
fn supply_mismatch_appends_nothing() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![
            Balance::new("A", coins("100atom")),
            Balance::new("B", coins("50atom")),
        ],
        supply: coins("200atom"),
        ..Default::default()
    };

    let err = init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap_err();
    assert!(err.is_supply_mismatch());
    let message = err.to_string();
    assert!(message.contains("200atom"), "{message}");
    assert!(message.contains("150atom"), "{message}");

    assert!(records(&sink).is_empty());
    assert_eq!(sink.stats().written, 0);
}

#[test]
fn duplicate_holders_are_merged_before_recording() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![
            Balance::new("A", coins("60atom")),
            Balance::new("A", coins("40atom")),
        ],
        supply: coins("100atom"),
        ..Default::default()
    };

    init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap();

    let lines = records(&sink);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["to"]["address"], "A");
    assert_eq!(lines[0]["coin"]["amount"], "100");
    assert_eq!(lines[0]["to"]["balance"]["amount"], "100");
}

#[test]
fn empty_declared_supply_is_derived() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![Balance::new("A", coins("7atom,3stake"))],
        ..Default::default()
    };

    let total = init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap();
    assert_eq!(total, coins("7atom,3stake"));

    let actions: Vec<_> = records(&sink)
        .iter()
        .map(|r| {
            format!(
                "{}:{}",
                r["action"].as_str().unwrap(),
                r["coin"]["denom"].as_str().unwrap()
            )
        })
        .collect();
    assert_eq!(
        actions,
        [
            "genesis_balance:atom",
            "genesis_balance:stake",
            "genesis_supply:atom",
            "genesis_supply:stake",
        ]
    );
}

#[test]
fn module_accounts_are_labelled() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper =
        MemoryBankKeeper::new().with_module("bonded_tokens_pool", &[ModulePermission::Burner]);
    let pool = keeper.module_address("bonded_tokens_pool").unwrap();
    let state = GenesisState {
        balances: vec![Balance::new(pool.clone(), coins("10stake"))],
        supply: coins("10stake"),
        ..Default::default()
    };

    init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap();

    let lines = records(&sink);
    assert_eq!(lines[0]["to"]["moduleName"], "bonded_tokens_pool");
    assert_eq!(lines[0]["to"]["address"], pool.as_str());
}

#[test]
fn simulated_genesis_applies_state_but_records_nothing() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![Balance::new("A", coins("1atom"))],
        ..Default::default()
    };

    init_genesis(&genesis_ctx().simulated(), &mut keeper, &sink, state).unwrap();

    assert_eq!(keeper.balance("A", "atom").amount, 1);
    assert!(records(&sink).is_empty());
    assert_eq!(sink.stats().suppressed, 2);
}

#[test]
fn export_then_import_is_a_fixed_point() {
    let home = tempfile::tempdir().unwrap();
    let sink = Arc::new(open_sink(&home));
    let mut bank = IndexedBank::new(
        MemoryBankKeeper::new().with_module("mint", &[ModulePermission::Minter]),
        sink.clone(),
    );
    bank.init_genesis(
        &genesis_ctx(),
        GenesisState {
            balances: vec![
                Balance::new("B", coins("50atom")),
                Balance::new("A", coins("100atom,9stake")),
            ],
            supply: coins("150atom,9stake"),
            ..Default::default()
        },
    )
    .unwrap();
    let ctx = BlockContext::new(3, Utc::now());
    bank.mint_coins(&ctx, "mint", &coins("25atom")).unwrap();
    bank.send_coins(&ctx, "A", "C", &coins("4stake")).unwrap();

    let exported = bank.export_genesis().unwrap();
    assert_eq!(exported.supply, coins("175atom,9stake"));

    let mut fresh = MemoryBankKeeper::new().with_module("mint", &[ModulePermission::Minter]);
    let reimported_sink = EventSink::<BankEvent>::open_at(home.path(), "reimport.txt").unwrap();
    init_genesis(&genesis_ctx(), &mut fresh, &reimported_sink, exported.clone()).unwrap();

    assert_eq!(export_genesis(&fresh).unwrap(), exported);
}

#[test]
fn invalid_address_aborts_genesis() {
    let home = tempfile::tempdir().unwrap();
    let sink = open_sink(&home);
    let mut keeper = MemoryBankKeeper::new();
    let state = GenesisState {
        balances: vec![Balance::new("not an address", coins("1atom"))],
        ..Default::default()
    };

    let err = init_genesis(&genesis_ctx(), &mut keeper, &sink, state).unwrap_err();
    assert!(matches!(err, GenesisError::Balance { .. }));
    assert!(records(&sink).is_empty());
}

#[test]
fn export_walks_every_balance_page() {
    let mut keeper = MemoryBankKeeper::new();
    let holders = ledgerindex_bank::MAX_PAGE_LIMIT as usize + 250;
    for i in 0..holders {
        keeper
            .init_balances(&format!("acct{i:05}"), &coins("2atom"))
            .unwrap();
    }
    keeper
        .set_supply(&ledgerindex_core::Coin::new("atom", 2 * holders as u128))
        .unwrap();

    let exported = export_genesis(&keeper).unwrap();
    assert_eq!(exported.balances.len(), holders);
    assert_eq!(exported.balances.last().unwrap().address, format!("acct{:05}", holders - 1));
    assert_eq!(exported.supply.amount_of("atom"), 2 * holders as u128);
}

#[test]
fn self_contradictory_supply_document_is_rejected() {
    let doc = r#"{
        "balances": [
            {"address": "A", "coins": [{"denom": "atom", "amount": "100"}]},
            {"address": "B", "coins": [{"denom": "atom", "amount": "50"}]}
        ],
        "supply": [
            {"denom": "atom", "amount": "100"},
            {"denom": "atom", "amount": "50"},
            {"denom": "stake", "amount": "0"}
        ]
    }"#;
    let err = GenesisState::from_json_str(doc).unwrap_err();
    assert!(err.to_string().contains("duplicate denom: atom"), "{err}");

    let zero_only = r#"{"supply": [{"denom": "stake", "amount": "0"}]}"#;
    assert!(GenesisState::from_json_str(zero_only).is_err());

    let repeated_balance = r#"{
        "balances": [{"address": "A", "coins": [
            {"denom": "atom", "amount": "1"},
            {"denom": "atom", "amount": "1"}
        ]}]
    }"#;
    assert!(GenesisState::from_json_str(repeated_balance).is_err());
}
