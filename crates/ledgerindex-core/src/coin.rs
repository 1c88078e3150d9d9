//! Coins, normalized coin sets, sentinel-aware coin readings, and fixed-point decimals.
//!
//! Amounts travel on the wire as decimal strings (`{"denom":"atom","amount":"100"}`).
//! The reserved amount `"-1"` means "not applicable" and only ever appears through
//! [`CoinReading::NotApplicable`]; a real zero is always `"0"`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoinError;

/// Non-negative token amount.
pub type Amount = u128;

/// Wire amount reserved for "not applicable".
pub const NOT_APPLICABLE_AMOUNT: &str = "-1";

/// Check a denomination against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let mut chars = denom.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && (3..=128).contains(&denom.len())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

mod amount_string {
    use super::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Coin ─────────────────────────────────────────────────────────────────────

/// A single denomination and amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_string")]
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn validate(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    /// Parse `"100atom"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinError::Parse(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinError::Parse(s.to_string()));
        }
        let amount = amount.parse().map_err(|_| CoinError::InvalidAmount {
            denom: denom.to_string(),
            amount: amount.to_string(),
        })?;
        let coin = Coin::new(denom, amount);
        coin.validate()?;
        Ok(coin)
    }
}

// ─── Coins ────────────────────────────────────────────────────────────────────

/// A normalized coin set: sorted by denom, no zero entries, one entry per denom.
///
/// Equality is set equality, so two supplies compare equal iff every denom
/// carries the same amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(BTreeMap<String, Amount>);

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary coins, merging duplicates.
    pub fn from_coins<I>(coins: I) -> Result<Self, CoinError>
    where
        I: IntoIterator<Item = Coin>,
    {
        let mut set = Self::new();
        for coin in coins {
            set.add(&coin)?;
        }
        Ok(set)
    }

    /// Build a set from an already-normalized list: every amount positive and
    /// each denom listed once. Used for decoding, where a repeated or zero
    /// entry means the document contradicts itself.
    pub fn from_strict<I>(coins: I) -> Result<Self, CoinError>
    where
        I: IntoIterator<Item = Coin>,
    {
        let mut set = Self::new();
        for coin in coins {
            coin.validate()?;
            if coin.is_zero() {
                return Err(CoinError::ZeroAmount(coin.denom));
            }
            if set.0.contains_key(&coin.denom) {
                return Err(CoinError::DuplicateDenom(coin.denom));
            }
            set.0.insert(coin.denom, coin.amount);
        }
        Ok(set)
    }

    /// Add a coin. Zero amounts are validated and then ignored.
    pub fn add(&mut self, coin: &Coin) -> Result<(), CoinError> {
        coin.validate()?;
        if coin.is_zero() {
            return Ok(());
        }
        let entry = self.0.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.checked_add(coin.amount).ok_or_else(|| CoinError::Overflow {
            denom: coin.denom.clone(),
        })?;
        Ok(())
    }

    pub fn add_all(&mut self, other: &Coins) -> Result<(), CoinError> {
        for coin in other.iter() {
            self.add(&coin)?;
        }
        Ok(())
    }

    /// Subtract a coin, failing without modification if the set holds too little.
    pub fn checked_sub(&mut self, coin: &Coin) -> Result<(), CoinError> {
        if coin.is_zero() {
            return Ok(());
        }
        let available = self.amount_of(&coin.denom);
        let remaining =
            available
                .checked_sub(coin.amount)
                .ok_or_else(|| CoinError::Insufficient {
                    denom: coin.denom.clone(),
                    available,
                    required: coin.amount,
                })?;
        if remaining == 0 {
            self.0.remove(&coin.denom);
        } else {
            self.0.insert(coin.denom.clone(), remaining);
        }
        Ok(())
    }

    /// Replace the amount held for one denom (zero removes it).
    pub fn set(&mut self, coin: &Coin) -> Result<(), CoinError> {
        coin.validate()?;
        if coin.is_zero() {
            self.0.remove(&coin.denom);
        } else {
            self.0.insert(coin.denom.clone(), coin.amount);
        }
        Ok(())
    }

    pub fn amount_of(&self, denom: &str) -> Amount {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// Returns `true` if every coin of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|(denom, amount)| self.amount_of(denom) >= *amount)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Coins in ascending denom order.
    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::from_strict(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.iter().collect()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinError;

    /// Parse `"100atom,50stake"`; the empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::new());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_coins(coins)
    }
}

// ─── CoinReading ──────────────────────────────────────────────────────────────

/// A coin field that may be "not applicable" for a given event.
///
/// Serialized in the legacy shape: `NotApplicable` becomes
/// `{"denom": <denom>, "amount": "-1"}` so existing consumers keep telling it
/// apart from a real zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CoinWire", try_from = "CoinWire")]
pub enum CoinReading {
    Known(Coin),
    NotApplicable { denom: String },
}

impl CoinReading {
    pub fn not_applicable(denom: impl Into<String>) -> Self {
        Self::NotApplicable {
            denom: denom.into(),
        }
    }

    pub fn denom(&self) -> &str {
        match self {
            Self::Known(coin) => &coin.denom,
            Self::NotApplicable { denom } => denom,
        }
    }

    /// The amount, or `None` when not applicable.
    pub fn amount(&self) -> Option<Amount> {
        match self {
            Self::Known(coin) => Some(coin.amount),
            Self::NotApplicable { .. } => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Coin> for CoinReading {
    fn from(coin: Coin) -> Self {
        Self::Known(coin)
    }
}

impl fmt::Display for CoinReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(coin) => write!(f, "{coin}"),
            Self::NotApplicable { denom } => write!(f, "n/a{denom}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoinWire {
    denom: String,
    amount: String,
}

impl From<CoinReading> for CoinWire {
    fn from(reading: CoinReading) -> Self {
        match reading {
            CoinReading::Known(coin) => CoinWire {
                denom: coin.denom,
                amount: coin.amount.to_string(),
            },
            CoinReading::NotApplicable { denom } => CoinWire {
                denom,
                amount: NOT_APPLICABLE_AMOUNT.to_string(),
            },
        }
    }
}

impl TryFrom<CoinWire> for CoinReading {
    type Error = CoinError;

    fn try_from(wire: CoinWire) -> Result<Self, Self::Error> {
        if wire.amount == NOT_APPLICABLE_AMOUNT {
            return Ok(CoinReading::NotApplicable { denom: wire.denom });
        }
        let amount = wire.amount.parse().map_err(|_| CoinError::InvalidAmount {
            denom: wire.denom.clone(),
            amount: wire.amount.clone(),
        })?;
        Ok(CoinReading::Known(Coin::new(wire.denom, amount)))
    }
}

// ─── Dec ──────────────────────────────────────────────────────────────────────

/// Non-negative fixed-point decimal with 18 fractional digits.
///
/// Used for delegation shares and slash factors. Products and quotients go
/// through 256-bit intermediates and truncate toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(u128);

const DEC_ONE_RAW: u128 = 1_000_000_000_000_000_000;

fn narrow(v: U256) -> Option<u128> {
    if v > U256::from(u128::MAX) {
        None
    } else {
        Some(v.low_u128())
    }
}

impl Dec {
    pub const PRECISION: usize = 18;
    pub const ZERO: Dec = Dec(0);
    pub const ONE: Dec = Dec(DEC_ONE_RAW);

    /// Wrap a raw value already scaled by 10^18.
    pub const fn from_raw(raw: u128) -> Self {
        Dec(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub fn from_int(v: u128) -> Option<Self> {
        v.checked_mul(DEC_ONE_RAW).map(Dec)
    }

    /// `num / den`, or `None` for a zero denominator or overflow.
    pub fn from_ratio(num: u128, den: u128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        narrow(U256::from(num) * U256::from(DEC_ONE_RAW) / U256::from(den)).map(Dec)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Dec) -> Option<Dec> {
        self.0.checked_add(other.0).map(Dec)
    }

    pub fn checked_sub(self, other: Dec) -> Option<Dec> {
        self.0.checked_sub(other.0).map(Dec)
    }

    pub fn checked_mul(self, other: Dec) -> Option<Dec> {
        narrow(U256::from(self.0) * U256::from(other.0) / U256::from(DEC_ONE_RAW)).map(Dec)
    }

    pub fn checked_quo(self, other: Dec) -> Option<Dec> {
        if other.is_zero() {
            return None;
        }
        narrow(U256::from(self.0) * U256::from(DEC_ONE_RAW) / U256::from(other.0)).map(Dec)
    }

    /// `self * v`, truncated to an integer amount.
    pub fn mul_int_truncate(self, v: Amount) -> Option<Amount> {
        narrow(U256::from(self.0) * U256::from(v) / U256::from(DEC_ONE_RAW))
    }

    /// `self * num / den`, with a single truncation at the end.
    pub fn mul_ratio(self, num: u128, den: u128) -> Option<Dec> {
        if den == 0 {
            return None;
        }
        narrow(U256::from(self.0) * U256::from(num) / U256::from(den)).map(Dec)
    }

    /// The part of `amount` that `self` represents out of `total`, truncated.
    pub fn portion_of(self, total: Dec, amount: Amount) -> Option<Amount> {
        if total.is_zero() {
            return None;
        }
        narrow(U256::from(self.0) * U256::from(amount) / U256::from(total.0))
    }

    /// Integer part, truncated.
    pub fn truncate(self) -> Amount {
        self.0 / DEC_ONE_RAW
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / DEC_ONE_RAW,
            self.0 % DEC_ONE_RAW,
            width = Self::PRECISION
        )
    }
}

impl FromStr for Dec {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoinError::InvalidDecimal(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if int_part.is_empty()
            || !all_digits(int_part)
            || !all_digits(frac_part)
            || frac_part.len() > Self::PRECISION
            || (s.contains('.') && frac_part.is_empty())
        {
            return Err(invalid());
        }
        let int: u128 = int_part.parse().map_err(|_| invalid())?;
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<width$}", width = Self::PRECISION);
            padded.parse().map_err(|_| invalid())?
        };
        int.checked_mul(DEC_ONE_RAW)
            .and_then(|v| v.checked_add(frac))
            .map(Dec)
            .ok_or_else(invalid)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
