//! Metrics command implementation.

use anyhow::{Result, bail};
use saham_analysis::registry::{
    available_categories, available_metrics, get_metric_info, metrics_by_category,
};
use saham_analysis::{MetricCategory, MetricInfo};

/// Print one metric's definition.
pub(crate) fn show_metric(name: &str) -> Result<()> {
    let Some(info) = get_metric_info(name) else {
        bail!(
            "unknown metric '{name}', expected one of: {}",
            available_metrics()
                .iter()
                .map(|m| m.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    };
    println!("{}", describe_metric(&info));
    Ok(())
}

fn describe_metric(info: &MetricInfo) -> String {
    let guard = info
        .guard
        .map_or_else(|| "none".to_string(), |g| format!("zero unless {g} > 0"));
    format!(
        "{}\n  column:   {}\n  category: {:?}\n  formula:  {}\n  guard:    {guard}",
        info.name, info.label, info.category, info.description
    )
}

/// List the derived metrics, grouped by category.
pub(crate) fn list_metrics(category: Option<&str>, verbose: bool) -> Result<()> {
    let categories = match category {
        Some(name) => match MetricCategory::parse(name) {
            Some(c) => vec![c],
            None => bail!(
                "unknown metric category '{name}', expected one of: {}",
                available_categories()
                    .iter()
                    .map(|c| format!("{c:?}").to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
        None => available_categories(),
    };

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Derived Metrics                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for cat in categories {
        let metrics = metrics_by_category(&cat);
        if metrics.is_empty() {
            continue;
        }

        println!("{cat:?}: {}", cat.description());
        println!("{}", "-".repeat(60));

        for metric in metrics {
            if verbose {
                println!("  {:28} - {}", metric.name, metric.description);
                println!("  {:28}   column: {}", "", metric.label);
                if let Some(guard) = metric.guard {
                    println!("  {:28}   zero unless {guard} > 0", "");
                }
            } else {
                println!("  {:28} {}", metric.name, metric.label);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for formulas.\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_guarded_metric() {
        let info = get_metric_info("cce").unwrap();
        let text = describe_metric(&info);
        assert!(text.starts_with("cce\n"));
        assert!(text.contains("column:   CCE"));
        assert!(text.contains("zero unless revenue_ttm > 0"));
    }

    #[test]
    fn test_describe_unguarded_metric() {
        let info = get_metric_info("composite_rank").unwrap();
        assert!(describe_metric(&info).ends_with("guard:    none"));
    }

    #[test]
    fn test_show_unknown_metric_fails() {
        let err = show_metric("per_ratio").unwrap_err();
        assert!(err.to_string().contains("unknown metric 'per_ratio'"));
        assert!(show_metric("cce").is_ok());
    }
}
