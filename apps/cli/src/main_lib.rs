use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pcbquote_core::customs::{CustomsFeeCalculator, CustomsFeeParams, DeclarationMethod};
use pcbquote_core::fx::RefreshOutcome;
use pcbquote_core::{translate_value, PriceEstimator, PricingConfig, QuoteCostInput, RateCache};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "PCBQ_LOG_FORMAT";

#[derive(Parser, Debug)]
#[command(name = "pcbquote", version, about = "PCB quote pricing support")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price a quote in the quote currency, customs included
    Estimate(EstimateArgs),
    /// Rename quote form fields to backend column names
    Translate {
        /// JSON file holding the form, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// ISO country code of the destination
    #[arg(long)]
    pub country: String,
    /// self-declare, ddp or agent
    #[arg(long)]
    pub method: DeclarationMethod,
    #[arg(long, default_value = "DHL")]
    pub courier: String,
    /// Declared value in the quote currency
    #[arg(long)]
    pub declared_value: Decimal,
    /// Board cost in the base currency
    #[arg(long, default_value = "0")]
    pub board_cost: Decimal,
    /// Shipping cost in the base currency
    #[arg(long, default_value = "0")]
    pub shipping_cost: Decimal,
    #[arg(long)]
    pub pcb_type: Option<String>,
    /// Skip the rate fetch and price at the cached fallback rate
    #[arg(long)]
    pub offline: bool,
}

impl EstimateArgs {
    fn to_input(&self) -> QuoteCostInput {
        let mut customs = CustomsFeeParams::new(
            self.country.trim().to_ascii_uppercase(),
            self.method,
            self.courier.clone(),
            self.declared_value,
        );
        if let Some(pcb_type) = &self.pcb_type {
            customs = customs.with_pcb_type(pcb_type.clone());
        }
        QuoteCostInput::new(self.board_cost, self.shipping_cost, customs)
    }
}

/// Logs go to stderr so stdout carries only the command's JSON.
pub fn init_tracing() {
    let log_format = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Runs one command and returns the pretty-printed JSON it produces.
pub async fn run(command: Command, config: &PricingConfig) -> anyhow::Result<String> {
    match command {
        Command::Estimate(args) => {
            let cache = RateCache::install_global(RateCache::from_config(config));
            estimate(&args, cache.clone()).await
        }
        Command::Translate { input } => translate(&input),
    }
}

pub async fn estimate(args: &EstimateArgs, cache: RateCache) -> anyhow::Result<String> {
    let input = args.to_input();
    input.validate()?;

    if args.offline {
        tracing::info!("Offline, pricing at {}", cache.get().rate);
    } else {
        match cache.refresh().await {
            RefreshOutcome::Updated(rate) => {
                tracing::info!(
                    "Using {} rate {} from {}",
                    rate.pair_key(),
                    rate.rate,
                    rate.source
                );
            }
            RefreshOutcome::Failed { error, retained } => {
                tracing::warn!("Rate refresh failed ({}), using {}", error, retained.rate);
            }
        }
    }

    let estimator = PriceEstimator::new(cache, CustomsFeeCalculator::default());
    let estimate = estimator.estimate(&input);
    Ok(serde_json::to_string_pretty(&estimate)?)
}

pub fn translate(input: &Path) -> anyhow::Result<String> {
    let raw = read_input(input)?;
    let form: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Quote form in {} is not valid JSON", input.display()))?;
    let payload = translate_value(&form)?;
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read quote form from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read quote form from {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pcbquote").chain(args.iter().copied())).unwrap()
    }

    fn estimate_args(args: &[&str]) -> EstimateArgs {
        let mut argv = vec!["estimate"];
        argv.extend_from_slice(args);
        match parse(&argv).command {
            Command::Estimate(args) => args,
            other => panic!("expected estimate, got {:?}", other),
        }
    }

    fn offline_cache() -> RateCache {
        RateCache::from_config(&PricingConfig::default())
    }

    #[test]
    fn test_parse_estimate() {
        let args = estimate_args(&[
            "--country",
            "de",
            "--method",
            "ddp",
            "--declared-value",
            "100",
            "--board-cost",
            "500",
            "--pcb-type",
            "rigid",
            "--offline",
        ]);

        assert_eq!(args.method, DeclarationMethod::Ddp);
        assert_eq!(args.courier, "DHL");
        assert_eq!(args.declared_value, dec!(100));
        assert_eq!(args.shipping_cost, Decimal::ZERO);
        assert!(args.offline);

        let input = args.to_input();
        assert_eq!(input.customs.country, "DE");
        assert_eq!(input.customs.pcb_type.as_deref(), Some("rigid"));
    }

    #[test]
    fn test_parse_rejects_bad_decimal() {
        let result = Cli::try_parse_from([
            "pcbquote",
            "estimate",
            "--country",
            "US",
            "--method",
            "ddp",
            "--declared-value",
            "lots",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_translate_defaults_to_stdin() {
        match parse(&["translate"]).command {
            Command::Translate { input } => assert_eq!(input, PathBuf::from("-")),
            other => panic!("expected translate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_estimate() {
        let args = estimate_args(&[
            "--country",
            "DE",
            "--method",
            "ddp",
            "--declared-value",
            "100",
            "--board-cost",
            "500",
            "--shipping-cost",
            "120",
            "--offline",
        ]);

        let output = estimate(&args, offline_cache()).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["currency"], "USD");
        assert_eq!(json["rateIsFallback"], true);
        assert_eq!(json["customs"]["includedInCourier"], true);
        let grand_total: Decimal = json["grandTotal"].as_str().unwrap().parse().unwrap();
        assert_eq!(grand_total, dec!(133.80));
    }

    #[tokio::test]
    async fn test_estimate_rejects_negative_declared_value() {
        let args = estimate_args(&[
            "--country",
            "US",
            "--method",
            "self-declare",
            "--declared-value=-5",
            "--offline",
        ]);

        assert!(estimate(&args, offline_cache()).await.is_err());
    }

    #[test]
    fn test_translate_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pcbType":"rigid","foo":"bar"}}"#).unwrap();

        let output = translate(file.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json, serde_json::json!({"pcbtype": "rigid", "foo": "bar"}));
    }

    #[test]
    fn test_translate_rejects_non_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(translate(file.path()).is_err());

        let missing = Path::new("/nonexistent/quote-form.json");
        assert!(translate(missing).is_err());
    }
}
