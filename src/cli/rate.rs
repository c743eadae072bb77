//! Exchange rate CLI commands

use clap::Subcommand;

use crate::error::SplitResult;
use crate::services::RateService;
use crate::storage::Storage;

use super::split::parse_date_or_today;

/// Rate subcommands
#[derive(Subcommand)]
pub enum RateCommands {
    /// Store the rate converting one currency into another on a date
    Set {
        /// Date the rate applies to (YYYY-MM-DD)
        date: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
        /// Units of `to` per unit of `from` (e.g. "0.9235")
        rate: String,
    },
    /// List stored rates
    List,
}

/// Handle a rate command
pub fn handle_rate_command(storage: &Storage, cmd: RateCommands) -> SplitResult<()> {
    let service = RateService::new(storage);

    match cmd {
        RateCommands::Set {
            date,
            from,
            to,
            rate,
        } => {
            let date = parse_date_or_today(Some(&date))?;
            let stored = service.set(date, &from, &to, &rate)?;
            println!(
                "Stored rate: 1 {} = {} {} on {}",
                stored.source,
                format_rate(stored.amount, stored.scale),
                stored.target,
                stored.date
            );
        }

        RateCommands::List => {
            let rates = service.list()?;
            if rates.is_empty() {
                println!("No rates found.");
                return Ok(());
            }

            println!("{:10}  {:6}  {:6}  {:>12}", "Date", "From", "To", "Rate");
            println!("{}", "-".repeat(40));
            for rate in &rates {
                println!(
                    "{:10}  {:6}  {:6}  {:>12}",
                    rate.date.format("%Y-%m-%d"),
                    rate.source,
                    rate.target,
                    format_rate(rate.amount, rate.scale)
                );
            }
        }
    }

    Ok(())
}

/// Render a fixed-point rate as a decimal string
fn format_rate(amount: i64, scale: u32) -> String {
    if scale == 0 {
        return amount.to_string();
    }
    let digits = format!("{:0>width$}", amount, width = scale as usize + 1);
    let (whole, frac) = digits.split_at(digits.len() - scale as usize);
    format!("{}.{}", whole, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(9235, 4), "0.9235");
        assert_eq!(format_rate(1515, 1), "151.5");
        assert_eq!(format_rate(12, 0), "12");
        assert_eq!(format_rate(5, 3), "0.005");
    }
}
