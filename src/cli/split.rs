//! Split and submit CLI commands
//!
//! Both commands build a split session over every registered participant,
//! apply each `--set name=value` as a commit (so redistribution happens just
//! as it would in an interactive form), and then either print the result or
//! submit it.

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use tracing::debug;

use crate::allocation::{CommitOutcome, InputKind, SplitSession, MAX_FIELD_STEPS};
use crate::config::settings::Settings;
use crate::display::format_share_table;
use crate::error::{SplitError, SplitResult};
use crate::export::{export_split_csv, export_split_json, export_split_yaml};
use crate::models::{Money, Participant, SplitMode};
use crate::services::{LocalLedger, ParticipantService, RateService, SubmissionService};
use crate::storage::Storage;

/// Output format for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Csv,
}

/// Options shared by `split` and `submit`
#[derive(Debug, Clone, Args)]
pub struct SplitArgs {
    /// Transaction total (e.g. "42.50")
    pub amount: String,

    /// Split mode: evenly, selected, shares, percentage or amounts
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Set one participant's value, as name=value (repeatable, applied in order)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Currency of the total, defaults to the sheet currency
    #[arg(short, long)]
    pub currency: Option<String>,
}

/// Arguments of `split`
#[derive(Debug, Clone, Args)]
pub struct SplitCommandArgs {
    #[command(flatten)]
    pub split: SplitArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also show the total converted into this currency
    #[arg(long, value_name = "CURRENCY")]
    pub preview_currency: Option<String>,

    /// Date of the conversion rate (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Arguments of `submit`
#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub split: SplitArgs,

    /// Participant who paid
    #[arg(short, long)]
    pub payer: String,

    /// Memo
    #[arg(long)]
    pub memo: Option<String>,

    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Handle `split`
pub fn handle_split_command(
    storage: &Storage,
    settings: &Settings,
    args: SplitCommandArgs,
) -> SplitResult<()> {
    let (participants, session) = build_session(storage, settings, &args.split)?;
    let mut stdout = std::io::stdout();

    match args.format {
        OutputFormat::Table => {
            print!("{}", format_share_table(&session, &participants));

            if let Some(target) = args.preview_currency {
                let date = parse_date_or_today(args.date.as_deref())?;
                let total = &session.spec().total;
                match RateService::new(storage).preview(total, date, &target, settings.currency_scale)
                {
                    Ok(preview) => println!(
                        "Preview: {} = {} (rate on {})",
                        preview.original, preview.converted, date
                    ),
                    Err(e) if e.is_not_found() => println!("Preview unavailable: {}", e),
                    Err(e) => return Err(e),
                }
            }
        }
        OutputFormat::Json => {
            export_split_json(&session, &participants, &mut stdout, true)?;
            println!();
        }
        OutputFormat::Yaml => export_split_yaml(&session, &participants, &mut stdout)?,
        OutputFormat::Csv => export_split_csv(&session, &participants, &mut stdout)?,
    }

    Ok(())
}

/// Handle `submit`
pub fn handle_submit_command(
    storage: &Storage,
    settings: &Settings,
    args: SubmitArgs,
) -> SplitResult<()> {
    let (participants, session) = build_session(storage, settings, &args.split)?;
    let payer = ParticipantService::new(storage).require(&args.payer)?;
    let date = parse_date_or_today(args.date.as_deref())?;

    let ledger = LocalLedger::new(storage);
    let receipt = SubmissionService::new(&ledger).submit(
        &session,
        payer.id,
        date,
        args.memo.as_deref().unwrap_or(""),
    )?;

    print!("{}", format_share_table(&session, &participants));
    println!();
    println!(
        "Recorded {} paid by {} on {} ({})",
        session.spec().total,
        payer.display_name,
        date,
        receipt.transaction_id
    );
    Ok(())
}

/// Build a session over all participants and apply the `--set` edits
pub fn build_session(
    storage: &Storage,
    settings: &Settings,
    args: &SplitArgs,
) -> SplitResult<(Vec<Participant>, SplitSession)> {
    let service = ParticipantService::new(storage);
    let participants = service.list()?;
    if participants.is_empty() {
        return Err(SplitError::Validation(
            "No participants to split between. Add some with 'splitsheet participant add'."
                .into(),
        ));
    }

    let total = parse_total(settings, &args.amount, args.currency.as_deref())?;
    let mode = match &args.mode {
        Some(name) => SplitMode::parse(name).ok_or_else(|| {
            SplitError::malformed("mode", format!("unknown split mode '{}'", name))
        })?,
        None => settings.default_mode,
    };

    let ids = participants.iter().map(|p| p.id).collect();
    let mut session = SplitSession::with_mode(ids, total, mode);

    for assignment in &args.set {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            SplitError::malformed("set", format!("'{}' is not of the form name=value", assignment))
        })?;
        let participant = service.require(name.trim())?;
        let value = parse_field_value(mode, raw.trim(), &session.spec().total)?;

        let outcome = session.commit(participant.id, value)?;
        if let CommitOutcome::OverSubscribed { .. } = outcome {
            debug!(participant = %participant.display_name, "edit over-subscribes the split");
        }
    }

    Ok((participants, session))
}

/// Parse the transaction total
///
/// It must be greater than zero and no larger than an Amounts field can hold.
pub fn parse_total(settings: &Settings, amount: &str, currency: Option<&str>) -> SplitResult<Money> {
    let code = currency
        .map(|c| c.trim().to_uppercase())
        .unwrap_or_else(|| settings.currency_code.clone());

    let total = Money::parse(amount, settings.currency_scale, code)
        .map_err(|e| SplitError::malformed("amount", e.to_string()))?;
    if !total.is_positive() {
        return Err(SplitError::malformed("amount", "must be greater than zero"));
    }
    if total.amount() > MAX_FIELD_STEPS {
        return Err(SplitError::malformed(
            "amount",
            format!(
                "must not exceed {}",
                total.with_amount(MAX_FIELD_STEPS).format_plain()
            ),
        ));
    }
    Ok(total)
}

/// Parse a `--set` value in the unit of `mode`'s input field
pub fn parse_field_value(mode: SplitMode, raw: &str, total: &Money) -> SplitResult<f64> {
    let invalid = || SplitError::malformed(raw, format!("not a valid {} value", mode));

    match mode.input_kind() {
        InputKind::Toggle => match raw.to_lowercase().as_str() {
            "yes" | "y" | "true" | "on" | "1" => Ok(1.0),
            "no" | "n" | "false" | "off" | "0" => Ok(0.0),
            _ => Err(invalid()),
        },
        InputKind::Money => {
            let money = Money::parse(raw, total.scale(), total.currency_code())
                .map_err(|e| SplitError::malformed(raw, e.to_string()))?;
            Ok(money.amount() as f64)
        }
        InputKind::Decimal => raw
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid()),
        InputKind::None | InputKind::Numeric => raw.parse::<f64>().map_err(|_| invalid()),
    }
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub fn parse_date_or_today(date: Option<&str>) -> SplitResult<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| SplitError::malformed("date", format!("'{}' is not YYYY-MM-DD", s))),
        None => Ok(Local::now().date_naive()),
    }
}
