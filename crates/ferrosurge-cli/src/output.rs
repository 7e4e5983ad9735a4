use std::io::{self, Write};

use ferrosurge_core::{CycleReport, HistoryStore, SURGE_THRESHOLD_PCT};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// JSON document for one cycle: the report fields plus the retained
/// history per asset, so consumers can chart without a second call.
#[derive(Debug, Serialize)]
struct CyclePayload<'a> {
    #[serde(flatten)]
    report: &'a CycleReport,
    histories: &'a HistoryStore,
}

pub fn render_cycle(
    report: &CycleReport,
    histories: &HistoryStore,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => write_json(&mut out, report, histories, pretty)?,
        OutputFormat::Table => write_table(&mut out, report, histories)?,
    }
    out.flush()?;
    Ok(())
}

fn write_json<W: Write>(
    out: &mut W,
    report: &CycleReport,
    histories: &HistoryStore,
    pretty: bool,
) -> Result<(), CliError> {
    let payload = CyclePayload { report, histories };
    let encoded = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    writeln!(out, "{encoded}")?;
    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    report: &CycleReport,
    histories: &HistoryStore,
) -> io::Result<()> {
    writeln!(
        out,
        "cycle {} | {} | tracked {} | fetched {} | surging {} (>= {:.1}%)",
        report.cycle,
        report.generated_at,
        report.tracked,
        report.fetched,
        report.surging,
        SURGE_THRESHOLD_PCT
    )?;

    if report.is_warming_up() {
        writeln!(
            out,
            "Collecting data... please wait a minute to accumulate history."
        )?;
        return writeln!(out);
    }

    writeln!(out, "Top projected surges (next 30 minutes)")?;
    writeln!(
        out,
        "{:<16} {:>14} {:>10} {:>11} {:>8} {:>8} {:>8}",
        "Coin", "Price", "Gain", "Confidence", "1m", "5m", "15m"
    )?;
    for projection in &report.ranked {
        writeln!(
            out,
            "{:<16} {:>14} {:>10} {:>11} {:>8} {:>8} {:>8}",
            projection.asset.display_name(),
            format_price(projection.current_price),
            format!("{:.2}%", projection.projected_gain_pct),
            format!("{:.1}%", projection.confidence * 100.0),
            format_return(projection.returns.one_minute),
            format_return(projection.returns.five_minutes),
            format_return(projection.returns.fifteen_minutes),
        )?;
    }

    writeln!(out, "Price history (last hour)")?;
    for projection in &report.ranked {
        if let Some(history) = histories.get(&projection.asset) {
            let prices = history.prices().collect::<Vec<_>>();
            writeln!(
                out,
                "{:<16} {} ({} samples)",
                projection.asset.display_name(),
                sparkline(&prices),
                prices.len()
            )?;
        }
    }

    writeln!(
        out,
        "Projections are heuristic and informational only; they are not financial advice."
    )?;
    writeln!(out)
}

fn format_price(price: f64) -> String {
    if price >= 1_000.0 {
        format!("{price:.2}")
    } else if price >= 1.0 {
        format!("{price:.4}")
    } else {
        format!("{price:.6}")
    }
}

fn format_return(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

/// One block character per price, scaled between the series min and max.
fn sparkline(prices: &[f64]) -> String {
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    prices
        .iter()
        .map(|price| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((price - min) / span * top).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrosurge_core::{AssetId, MonitorConfig, Quote, QuoteMap, Session, UtcDateTime};

    fn at(seconds: i64) -> UtcDateTime {
        UtcDateTime::from_unix_timestamp(1_704_067_200 + seconds).expect("in range")
    }

    fn batch(id: &str, price: f64) -> QuoteMap {
        let asset = AssetId::parse(id).expect("valid");
        let quote = Quote::new(asset.clone(), price, at(0)).expect("valid quote");
        QuoteMap::from([(asset, quote)])
    }

    fn table(session: &Session, report: &CycleReport) -> String {
        let mut buffer = Vec::new();
        write_table(&mut buffer, report, session.histories()).expect("write to vec");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(sparkline(&[4.0, 4.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn warming_up_session_shows_collecting_message() {
        let mut session = Session::new(MonitorConfig::default()).expect("valid config");
        let report = session.apply(&batch("ripple", 0.5), at(0));

        let rendered = table(&session, &report);
        assert!(rendered.contains("Collecting data"));
    }

    #[test]
    fn ranked_rows_use_display_names_and_percentages() {
        let mut session = Session::new(MonitorConfig::default()).expect("valid config");
        session.apply(&batch("binancecoin", 100.0), at(0));
        let report = session.apply(&batch("binancecoin", 105.0), at(120));

        let rendered = table(&session, &report);
        assert!(rendered.contains("Binance Coin"));
        assert!(rendered.contains("75.00%"));
        assert!(rendered.contains("100.0%"));
        assert!(rendered.contains("(2 samples)"));
    }

    #[test]
    fn json_payload_carries_ranked_projections_and_histories() {
        let mut session = Session::new(MonitorConfig::default()).expect("valid config");
        session.apply(&batch("solana", 20.0), at(0));
        let report = session.apply(&batch("solana", 21.0), at(60));

        let mut buffer = Vec::new();
        write_json(&mut buffer, &report, session.histories(), false).expect("write to vec");
        let json: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");

        assert_eq!(json["cycle"], 2);
        assert_eq!(json["ranked"][0]["asset"], "solana");
        let samples = json["histories"]["solana"]["samples"]
            .as_array()
            .expect("samples array");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1]["price"], 21.0);
    }

    #[test]
    fn prices_keep_precision_for_small_values() {
        assert_eq!(format_price(67_000.5), "67000.50");
        assert_eq!(format_price(0.123456), "0.123456");
        assert_eq!(format_return(-0.0125), "-1.25%");
    }
}
