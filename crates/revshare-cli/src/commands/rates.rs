use clap::Args;
use serde_json::{json, Value};

use revshare_core::{RateTable, Title};

/// Arguments for listing the rate table
#[derive(Args)]
pub struct RatesArgs {
    /// Show a single title (label or code)
    #[arg(long)]
    pub title: Option<Title>,
}

pub fn run_rates(args: RatesArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    let records: Vec<Value> = table
        .entries()
        .filter(|(title, _)| args.title.map_or(true, |wanted| wanted == *title))
        .map(|(title, entry)| {
            json!({
                "Title": title.label(),
                "Code": title.code(),
                "L1 Bonus": entry.level1_bonus,
                "L2 Bonus": entry.level2_bonus,
                "L3 Bonus": entry.level3_bonus,
                "L1 Gen Bonus": entry.level1_gen_bonus,
                "L2 Gen Bonus": entry.level2_gen_bonus,
                "L3 Gen Bonus": entry.level3_gen_bonus,
                "Profit Share": entry.has_profit_share,
                "Profit Share Bonus": entry.profit_share_bonus,
            })
        })
        .collect();

    Ok(json!({
        "version": table.version(),
        "source": table.source(),
        "defaults": table.defaults(),
        "records": records,
    }))
}
