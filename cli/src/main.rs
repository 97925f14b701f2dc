//! Curve CLI - Offline bonding curve quoting and fee calculator
//!
//! Quotes buys and sells, inspects the fee schedule, and reports curve
//! analytics against a snapshot of already-decoded protocol state
//! (or the pump.fun mainnet defaults when no snapshot is given).

use clap::{Parser, Subcommand};
use colored::Colorize;
use curve_model::{Amount, CurveState};

mod analytics;
mod config;
mod display;
mod fees;
mod incentives;
mod quote;

use config::Snapshot;

#[derive(Parser)]
#[command(name = "curve")]
#[command(about = "Bonding curve quoting and fee calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot file with decoded protocol state (TOML). Defaults to pump.fun mainnet globals
    #[arg(short, long, global = true)]
    snapshot: Option<String>,

    /// Print machine-readable JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Buy and sell quotes
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Fee schedule inspection
    Fees {
        #[command(subcommand)]
        command: FeesCommands,
    },

    /// Market cap, graduation, pricing and price impact
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },

    /// Volume incentive token balances
    Incentives {
        #[command(subcommand)]
        command: IncentivesCommands,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Tokens received for spending a SOL amount (fees included)
    BuyTokens {
        /// Lamports to spend
        sol_amount: Amount,
    },

    /// SOL needed to buy a token amount (fees included)
    BuySol {
        /// Raw token units to receive (6 decimals)
        token_amount: Amount,
    },

    /// SOL received for selling a token amount (fees taken out)
    Sell {
        /// Raw token units to sell (6 decimals)
        token_amount: Amount,
    },
}

#[derive(Subcommand)]
enum FeesCommands {
    /// Look up the fee tier for a market cap
    Tier {
        /// Market cap in lamports
        #[arg(long)]
        market_cap: Amount,
    },

    /// Show the fee rates in effect for the snapshot curve
    Current {
        /// Also compute the fee charged on this many lamports
        #[arg(long)]
        amount: Option<Amount>,
    },
}

#[derive(Subcommand)]
enum AnalyticsCommands {
    /// Market cap and spot price
    MarketCap,

    /// Graduation progress toward the AMM
    Progress,

    /// Buy and sell price of one whole token
    Price,

    /// Market cap, progress, prices and reserves
    Summary,

    /// Price impact of a trade
    Impact {
        #[command(subcommand)]
        command: ImpactCommands,
    },
}

#[derive(Subcommand)]
enum ImpactCommands {
    /// Impact of spending a SOL amount
    Buy {
        /// Lamports to spend
        sol_amount: Amount,
    },

    /// Impact of selling a token amount
    Sell {
        /// Raw token units to sell (6 decimals)
        token_amount: Amount,
    },
}

#[derive(Subcommand)]
enum IncentivesCommands {
    /// Tokens claimable now, including a closed but unsettled day
    Unclaimed {
        /// Unix timestamp to evaluate at (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Tokens earned so far today
    Today {
        /// Unix timestamp to evaluate at (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let snapshot = Snapshot::load(cli.snapshot.as_deref())?;

    if cli.verbose && !cli.json {
        let source = match &snapshot.source {
            Some(path) => path.display().to_string(),
            None => "built-in mainnet defaults".to_string(),
        };
        let curve = match snapshot.curve_state() {
            CurveState::Existing { .. } => "existing",
            CurveState::NotYetCreated => "not yet created",
        };
        println!("{} {}", "Snapshot:".bright_cyan(), source);
        println!("{} {}", "Fee Regime:".bright_cyan(), snapshot.regime());
        println!("{} {}", "Curve:".bright_cyan(), curve);
        println!();
    }

    let json = cli.json;
    log::debug!("fee regime: {}", snapshot.regime());

    // Execute command
    match cli.command {
        Commands::Quote { command } => match command {
            QuoteCommands::BuyTokens { sol_amount } => {
                quote::buy_tokens(&snapshot, &sol_amount, json)?;
            }
            QuoteCommands::BuySol { token_amount } => {
                quote::buy_sol(&snapshot, &token_amount, json)?;
            }
            QuoteCommands::Sell { token_amount } => {
                quote::sell(&snapshot, &token_amount, json)?;
            }
        },
        Commands::Fees { command } => match command {
            FeesCommands::Tier { market_cap } => {
                fees::show_tier(&snapshot, &market_cap, json)?;
            }
            FeesCommands::Current { amount } => {
                fees::show_current(&snapshot, amount.as_ref(), json)?;
            }
        },
        Commands::Analytics { command } => match command {
            AnalyticsCommands::MarketCap => analytics::show_market_cap(&snapshot, json)?,
            AnalyticsCommands::Progress => analytics::show_progress(&snapshot, json)?,
            AnalyticsCommands::Price => analytics::show_price(&snapshot, json)?,
            AnalyticsCommands::Summary => analytics::show_summary(&snapshot, json)?,
            AnalyticsCommands::Impact { command } => match command {
                ImpactCommands::Buy { sol_amount } => {
                    analytics::show_buy_impact(&snapshot, &sol_amount, json)?;
                }
                ImpactCommands::Sell { token_amount } => {
                    analytics::show_sell_impact(&snapshot, &token_amount, json)?;
                }
            },
        },
        Commands::Incentives { command } => match command {
            IncentivesCommands::Unclaimed { now } => {
                incentives::show_unclaimed(&snapshot, now, json)?;
            }
            IncentivesCommands::Today { now } => {
                incentives::show_today(&snapshot, now, json)?;
            }
        },
    }

    Ok(())
}
