//! Snapshot loading: decoded protocol state read from a TOML file
//!
//! Every section but `[global]` is optional, and every `[global]` field
//! falls back to the pump.fun mainnet value. Amounts may be written as
//! TOML integers or, for values past `i64::MAX`, as decimal strings.
//! Pubkeys are base58 strings.
//!
//! ```toml
//! mint_supply = "1000000000000000"
//!
//! [global]
//! fee_basis_points = 95
//! creator_fee_basis_points = 5
//!
//! [fee_config]
//! [[fee_config.fee_tiers]]
//! market_cap_lamports_threshold = 0
//! protocol_fee_bps = 95
//! creator_fee_bps = 30
//!
//! [bonding_curve]
//! virtual_token_reserves = 1073000000000000
//! virtual_sol_reserves = 30000000000
//! real_token_reserves = 793100000000000
//! creator = "FFWtrEQ4B4PKQoVuHYzZq8FabGkVatYzDpEVHsK5rrhF"
//! ```

use anyhow::{Context, Result};
use curve_model::{
    Amount, BondingCurve, CurveState, FeeConfig, FeeTier, Fees, Global, GlobalVolumeAccumulator,
    ResolvedCurve, UserVolumeAccumulator, ONE_BILLION_SUPPLY,
};
use serde::{de, Deserialize, Deserializer};
use solana_program::{pubkey, pubkey::Pubkey};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Mainnet defaults
// ============================================================================

pub const MAINNET_INITIAL_VIRTUAL_TOKEN_RESERVES: u64 = 1_073_000_000_000_000;
pub const MAINNET_INITIAL_VIRTUAL_SOL_RESERVES: u64 = 30_000_000_000;
pub const MAINNET_INITIAL_REAL_TOKEN_RESERVES: u64 = 793_100_000_000_000;
pub const MAINNET_FEE_BASIS_POINTS: u64 = 95;
pub const MAINNET_CREATOR_FEE_BASIS_POINTS: u64 = 5;
pub const MAINNET_POOL_MIGRATION_FEE: u64 = 15_000_001;

pub const MAINNET_AUTHORITY: Pubkey = pubkey!("FFWtrEQ4B4PKQoVuHYzZq8FabGkVatYzDpEVHsK5rrhF");
pub const MAINNET_FEE_RECIPIENT: Pubkey = pubkey!("62qc2CNXwrYqQScmEdiZFFAnJR262PxWEuNQtxfafNgV");
pub const MAINNET_WITHDRAW_AUTHORITY: Pubkey =
    pubkey!("39azUYFWPz3VHgKCf3VChUwbpURdCHRxjWVowf5jUJjg");

pub const SECONDS_IN_A_DAY: i64 = 86_400;

/// Protocol state the CLI quotes against
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub global: Global,
    pub fee_config: Option<FeeConfig>,
    pub bonding_curve: Option<BondingCurve>,
    /// Overrides the curve's own `token_total_supply` when set
    pub mint_supply: Option<Amount>,
    pub global_volume: Option<GlobalVolumeAccumulator>,
    pub user_volume: Option<UserVolumeAccumulator>,
    /// File the snapshot was read from, `None` for built-in defaults
    pub source: Option<PathBuf>,
}

impl Snapshot {
    /// pump.fun mainnet globals, legacy fees, no curve
    pub fn mainnet() -> Self {
        Self {
            global: GlobalSection::default().into(),
            fee_config: None,
            bonding_curve: None,
            mint_supply: None,
            global_volume: None,
            user_volume: None,
            source: None,
        }
    }

    /// Load the snapshot at `path` (with `~` expanded), or the mainnet
    /// defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let expanded = shellexpand::tilde(path);
                Self::from_file(Path::new(expanded.as_ref()))
            }
            None => Ok(Self::mainnet()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Snapshot file not found: {}", path.display());
        }

        log::debug!("loading snapshot from {}", path.display());
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

        let mut snapshot = Self::parse(&data)
            .with_context(|| format!("Invalid snapshot: {}", path.display()))?;
        snapshot.source = Some(path.to_path_buf());
        Ok(snapshot)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let raw: SnapshotFile = toml::from_str(contents).context("Failed to parse snapshot TOML")?;

        let fee_config = raw.fee_config.map(FeeConfig::try_from).transpose()?;

        Ok(Self {
            global: raw.global.into(),
            fee_config,
            bonding_curve: raw.bonding_curve.map(Into::into),
            mint_supply: raw.mint_supply.map(|supply| supply.0),
            global_volume: raw.global_volume.map(Into::into),
            user_volume: raw.user_volume.map(Into::into),
            source: None,
        })
    }

    /// Buy-side curve input: the snapshot's curve, or a fresh one
    /// seeded from `[global]` when the snapshot has none.
    pub fn curve_state(&self) -> CurveState<'_> {
        match &self.bonding_curve {
            Some(curve) => CurveState::existing(curve, self.mint_supply_for(curve)),
            None => CurveState::NotYetCreated,
        }
    }

    /// Curve to run analytics on, fresh when the snapshot has none
    pub fn resolved_curve(&self) -> ResolvedCurve<'_> {
        self.curve_state().resolve(&self.global)
    }

    /// The snapshot's curve and mint supply, for operations that need
    /// a curve to already exist on chain.
    pub fn existing_curve(&self) -> Result<(&BondingCurve, &Amount)> {
        let curve = self
            .bonding_curve
            .as_ref()
            .context("Snapshot has no [bonding_curve] section; this operation needs an existing curve")?;
        Ok((curve, self.mint_supply_for(curve)))
    }

    pub fn volume_accumulators(&self) -> Result<(&GlobalVolumeAccumulator, &UserVolumeAccumulator)> {
        let global = self
            .global_volume
            .as_ref()
            .context("Snapshot has no [global_volume] section")?;
        let user = self
            .user_volume
            .as_ref()
            .context("Snapshot has no [user_volume] section")?;
        Ok((global, user))
    }

    /// Human name of the fee regime in effect
    pub fn regime(&self) -> &'static str {
        match &self.fee_config {
            None => "legacy (flat global fees)",
            Some(config) if config.fee_tiers.is_empty() => "flat (fee config without tiers)",
            Some(_) => "tiered (by market cap)",
        }
    }

    fn mint_supply_for<'a>(&'a self, curve: &'a BondingCurve) -> &'a Amount {
        self.mint_supply.as_ref().unwrap_or(&curve.token_total_supply)
    }
}

// ============================================================================
// TOML layout
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    #[serde(default)]
    global: GlobalSection,
    fee_config: Option<FeeConfigSection>,
    bonding_curve: Option<BondingCurveSection>,
    mint_supply: Option<TomlAmount>,
    global_volume: Option<GlobalVolumeSection>,
    user_volume: Option<UserVolumeSection>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GlobalSection {
    initialized: bool,
    #[serde(deserialize_with = "deserialize_pubkey")]
    authority: Pubkey,
    #[serde(deserialize_with = "deserialize_pubkey")]
    fee_recipient: Pubkey,
    initial_virtual_token_reserves: TomlAmount,
    initial_virtual_sol_reserves: TomlAmount,
    initial_real_token_reserves: TomlAmount,
    token_total_supply: TomlAmount,
    fee_basis_points: TomlAmount,
    #[serde(deserialize_with = "deserialize_pubkey")]
    withdraw_authority: Pubkey,
    enable_migrate: bool,
    pool_migration_fee: TomlAmount,
    creator_fee_basis_points: TomlAmount,
    #[serde(deserialize_with = "deserialize_pubkeys")]
    fee_recipients: Vec<Pubkey>,
    create_v2_enabled: bool,
    #[serde(deserialize_with = "deserialize_pubkey")]
    reserved_fee_recipient: Pubkey,
    mayhem_mode_enabled: bool,
    #[serde(deserialize_with = "deserialize_pubkeys")]
    reserved_fee_recipients: Vec<Pubkey>,
}

impl Default for GlobalSection {
    fn default() -> Self {
        Self {
            initialized: true,
            authority: MAINNET_AUTHORITY,
            fee_recipient: MAINNET_FEE_RECIPIENT,
            initial_virtual_token_reserves: MAINNET_INITIAL_VIRTUAL_TOKEN_RESERVES.into(),
            initial_virtual_sol_reserves: MAINNET_INITIAL_VIRTUAL_SOL_RESERVES.into(),
            initial_real_token_reserves: MAINNET_INITIAL_REAL_TOKEN_RESERVES.into(),
            token_total_supply: ONE_BILLION_SUPPLY.into(),
            fee_basis_points: MAINNET_FEE_BASIS_POINTS.into(),
            withdraw_authority: MAINNET_WITHDRAW_AUTHORITY,
            enable_migrate: true,
            pool_migration_fee: MAINNET_POOL_MIGRATION_FEE.into(),
            creator_fee_basis_points: MAINNET_CREATOR_FEE_BASIS_POINTS.into(),
            fee_recipients: Vec::new(),
            create_v2_enabled: false,
            reserved_fee_recipient: Pubkey::default(),
            mayhem_mode_enabled: false,
            reserved_fee_recipients: Vec::new(),
        }
    }
}

impl From<GlobalSection> for Global {
    fn from(raw: GlobalSection) -> Self {
        Global {
            initialized: raw.initialized,
            authority: raw.authority,
            fee_recipient: raw.fee_recipient,
            initial_virtual_token_reserves: raw.initial_virtual_token_reserves.0,
            initial_virtual_sol_reserves: raw.initial_virtual_sol_reserves.0,
            initial_real_token_reserves: raw.initial_real_token_reserves.0,
            token_total_supply: raw.token_total_supply.0,
            fee_basis_points: raw.fee_basis_points.0,
            withdraw_authority: raw.withdraw_authority,
            enable_migrate: raw.enable_migrate,
            pool_migration_fee: raw.pool_migration_fee.0,
            creator_fee_basis_points: raw.creator_fee_basis_points.0,
            fee_recipients: raw.fee_recipients,
            create_v2_enabled: raw.create_v2_enabled,
            reserved_fee_recipient: raw.reserved_fee_recipient,
            mayhem_mode_enabled: raw.mayhem_mode_enabled,
            reserved_fee_recipients: raw.reserved_fee_recipients,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FeesSection {
    lp_fee_bps: TomlAmount,
    protocol_fee_bps: TomlAmount,
    creator_fee_bps: TomlAmount,
}

impl From<FeesSection> for Fees {
    fn from(raw: FeesSection) -> Self {
        Fees {
            lp_fee_bps: raw.lp_fee_bps.0,
            protocol_fee_bps: raw.protocol_fee_bps.0,
            creator_fee_bps: raw.creator_fee_bps.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeeTierSection {
    market_cap_lamports_threshold: TomlAmount,
    #[serde(default)]
    lp_fee_bps: TomlAmount,
    #[serde(default)]
    protocol_fee_bps: TomlAmount,
    #[serde(default)]
    creator_fee_bps: TomlAmount,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FeeConfigSection {
    #[serde(deserialize_with = "deserialize_pubkey")]
    admin: Pubkey,
    flat_fees: FeesSection,
    fee_tiers: Vec<FeeTierSection>,
}

impl TryFrom<FeeConfigSection> for FeeConfig {
    type Error = anyhow::Error;

    fn try_from(raw: FeeConfigSection) -> Result<Self> {
        let fee_tiers: Vec<FeeTier> = raw
            .fee_tiers
            .into_iter()
            .map(|tier| FeeTier {
                market_cap_lamports_threshold: tier.market_cap_lamports_threshold.0,
                fees: Fees {
                    lp_fee_bps: tier.lp_fee_bps.0,
                    protocol_fee_bps: tier.protocol_fee_bps.0,
                    creator_fee_bps: tier.creator_fee_bps.0,
                },
            })
            .collect();

        // Tier lookup scans from the top, so order matters
        if let Some(pair) = fee_tiers
            .windows(2)
            .find(|pair| pair[0].market_cap_lamports_threshold > pair[1].market_cap_lamports_threshold)
        {
            anyhow::bail!(
                "fee_tiers must be sorted ascending by market_cap_lamports_threshold ({} listed before {})",
                pair[0].market_cap_lamports_threshold,
                pair[1].market_cap_lamports_threshold
            );
        }

        Ok(FeeConfig {
            admin: raw.admin,
            flat_fees: raw.flat_fees.into(),
            fee_tiers,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondingCurveSection {
    virtual_token_reserves: TomlAmount,
    virtual_sol_reserves: TomlAmount,
    real_token_reserves: TomlAmount,
    #[serde(default)]
    real_sol_reserves: TomlAmount,
    #[serde(default = "default_token_total_supply")]
    token_total_supply: TomlAmount,
    #[serde(default)]
    complete: bool,
    #[serde(default, deserialize_with = "deserialize_creator")]
    creator: Option<Pubkey>,
    #[serde(default)]
    is_mayhem_mode: bool,
}

fn default_token_total_supply() -> TomlAmount {
    ONE_BILLION_SUPPLY.into()
}

impl From<BondingCurveSection> for BondingCurve {
    fn from(raw: BondingCurveSection) -> Self {
        BondingCurve {
            virtual_token_reserves: raw.virtual_token_reserves.0,
            virtual_sol_reserves: raw.virtual_sol_reserves.0,
            real_token_reserves: raw.real_token_reserves.0,
            real_sol_reserves: raw.real_sol_reserves.0,
            token_total_supply: raw.token_total_supply.0,
            complete: raw.complete,
            creator: raw.creator,
            is_mayhem_mode: raw.is_mayhem_mode,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlobalVolumeSection {
    start_time: i64,
    end_time: i64,
    #[serde(default = "default_seconds_in_a_day")]
    seconds_in_a_day: i64,
    #[serde(default, deserialize_with = "deserialize_pubkey")]
    mint: Pubkey,
    #[serde(default, deserialize_with = "deserialize_amounts")]
    total_token_supply: Vec<Amount>,
    #[serde(default, deserialize_with = "deserialize_amounts")]
    sol_volumes: Vec<Amount>,
}

fn default_seconds_in_a_day() -> i64 {
    SECONDS_IN_A_DAY
}

impl From<GlobalVolumeSection> for GlobalVolumeAccumulator {
    fn from(raw: GlobalVolumeSection) -> Self {
        GlobalVolumeAccumulator {
            start_time: raw.start_time,
            end_time: raw.end_time,
            seconds_in_a_day: raw.seconds_in_a_day,
            mint: raw.mint,
            total_token_supply: raw.total_token_supply,
            sol_volumes: raw.sol_volumes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct UserVolumeSection {
    #[serde(deserialize_with = "deserialize_pubkey")]
    user: Pubkey,
    needs_claim: bool,
    total_unclaimed_tokens: TomlAmount,
    total_claimed_tokens: TomlAmount,
    current_sol_volume: TomlAmount,
    last_update_timestamp: i64,
}

impl From<UserVolumeSection> for UserVolumeAccumulator {
    fn from(raw: UserVolumeSection) -> Self {
        UserVolumeAccumulator {
            user: raw.user,
            needs_claim: raw.needs_claim,
            total_unclaimed_tokens: raw.total_unclaimed_tokens.0,
            total_claimed_tokens: raw.total_claimed_tokens.0,
            current_sol_volume: raw.current_sol_volume.0,
            last_update_timestamp: raw.last_update_timestamp,
        }
    }
}

// ============================================================================
// Field decoders
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Integer(u64),
    Decimal(String),
}

impl AmountRepr {
    fn into_amount<E: de::Error>(self) -> std::result::Result<Amount, E> {
        match self {
            AmountRepr::Integer(value) => Ok(Amount::from(value)),
            AmountRepr::Decimal(text) => {
                let digits = text.trim().replace('_', "");
                Amount::from_str(&digits)
                    .map_err(|e| E::custom(format!("invalid amount {:?}: {}", text, e)))
            }
        }
    }
}

/// Amount read from TOML, integer or decimal string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TomlAmount(Amount);

impl From<u64> for TomlAmount {
    fn from(value: u64) -> Self {
        TomlAmount(Amount::from(value))
    }
}

impl<'de> Deserialize<'de> for TomlAmount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        AmountRepr::deserialize(deserializer)?.into_amount().map(TomlAmount)
    }
}

fn deserialize_amounts<'de, D>(deserializer: D) -> std::result::Result<Vec<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<AmountRepr>::deserialize(deserializer)?
        .into_iter()
        .map(AmountRepr::into_amount)
        .collect()
}

fn parse_pubkey<E: de::Error>(text: &str) -> std::result::Result<Pubkey, E> {
    Pubkey::from_str(text.trim()).map_err(|e| E::custom(format!("invalid pubkey {:?}: {}", text, e)))
}

fn deserialize_pubkey<'de, D>(deserializer: D) -> std::result::Result<Pubkey, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_pubkey(&text)
}

fn deserialize_pubkeys<'de, D>(deserializer: D) -> std::result::Result<Vec<Pubkey>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|text| parse_pubkey(text))
        .collect()
}

/// The all-zero key is the on-chain "no creator" marker
fn deserialize_creator<'de, D>(deserializer: D) -> std::result::Result<Option<Pubkey>, D::Error>
where
    D: Deserializer<'de>,
{
    let key = deserialize_pubkey(deserializer)?;
    Ok((key != Pubkey::default()).then_some(key))
}
