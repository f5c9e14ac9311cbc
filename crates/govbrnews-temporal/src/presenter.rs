//! Markdown rendering of distributions.
//!
//! Rendering only formats; statistics are computed by the aggregator.

use std::fmt::Write;

use govbrnews_core::group_thousands;

use crate::distribution::Distribution;
use crate::error::{TemporalError, TemporalErrorKind};
use crate::granularity::Granularity;

/// Renders the outcome of a temporal analysis.
pub fn render(outcome: &Result<Distribution, TemporalError>) -> String {
    match outcome {
        Ok(distribution) => render_distribution(distribution),
        Err(error) => render_error(error),
    }
}

/// Renders a distribution as header, table and statistics.
pub fn render_distribution(d: &Distribution) -> String {
    let mut out = String::new();
    out.push_str("# Distribuição Temporal\n\n");
    let _ = writeln!(out, "**Query:** `{}`", d.query);
    let _ = writeln!(out, "**Granularidade:** {}", d.granularity);
    let _ = writeln!(
        out,
        "**Total encontrado:** {} notícias\n",
        group_thousands(d.total_found)
    );

    if let Some(note) = &d.note {
        let _ = writeln!(out, "*{note}*\n");
    }

    if !d.filters.is_empty() {
        out.push_str("**Filtros:**\n");
        if let Some(from) = d.filters.year_from {
            let _ = writeln!(out, "- Ano inicial: {from}");
        }
        if let Some(to) = d.filters.year_to {
            let _ = writeln!(out, "- Ano final: {to}");
        }
        out.push('\n');
    }

    if let Some((start, end)) = &d.window {
        let _ = writeln!(
            out,
            "**Janela:** {} a {}\n",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        );
    }

    if d.is_empty() {
        out.push_str("Nenhum dado encontrado para o período especificado.");
        return out;
    }

    out.push_str("## Distribuição\n\n");
    out.push_str("| Período | Quantidade |\n");
    out.push_str("|---------|------------|\n");
    for entry in &d.buckets {
        let _ = writeln!(
            out,
            "| {} | {} |",
            entry.bucket.label,
            group_thousands(entry.count)
        );
    }

    out.push_str("\n## Estatísticas\n\n");
    let stats = &d.stats;
    let _ = writeln!(out, "- **Total de períodos:** {}", stats.period_count);
    if let Some(mean) = stats.mean {
        let _ = writeln!(out, "- **Média por período:** {mean:.0}");
    }
    if let Some(max) = &stats.max {
        let _ = writeln!(
            out,
            "- **Máximo:** {} ({})",
            group_thousands(max.count),
            max.bucket.label
        );
    }
    if let Some(min) = &stats.min {
        let _ = write!(
            out,
            "- **Mínimo:** {} ({})",
            group_thousands(min.count),
            min.bucket.label
        );
    }
    out
}

/// Renders an aggregation-level failure.
pub fn render_error(error: &TemporalError) -> String {
    match error.kind {
        TemporalErrorKind::InvalidInput => render_invalid_granularity(&error.granularity),
        TemporalErrorKind::Backend => format!(
            "# Erro na Análise Temporal\n\n**Erro:** {}\n**Granularidade:** {}\n**Query:** `{}`",
            error.message, error.granularity, error.query
        ),
    }
}

/// Renders the list of valid granularities after an unknown one.
pub fn render_invalid_granularity(granularity: &str) -> String {
    let mut out = format!(
        "# Erro\n\nGranularidade inválida: `{granularity}`\n\n**Granularidades válidas:**"
    );
    for g in Granularity::ALL {
        let _ = write!(out, "\n- `{}` - {}", g.as_str(), g.description());
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::distribution::{BucketCount, DistributionStats, TimeBucket, YearFilters};
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    fn entry(label: &str, count: u64) -> BucketCount {
        let instant = Sao_Paulo.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        BucketCount {
            bucket: TimeBucket {
                period_key: label.to_string(),
                label: label.to_string(),
                start: instant,
                end: instant,
            },
            count,
        }
    }

    fn distribution(buckets: Vec<BucketCount>) -> Distribution {
        let stats = DistributionStats::compute(&buckets);
        Distribution {
            granularity: Granularity::Monthly,
            query: "educação".into(),
            total_found: 12345,
            buckets,
            filters: YearFilters {
                year_from: Some(2024),
                year_to: None,
            },
            window: None,
            note: Some("Distribuição mensal limitada a 24 períodos mais recentes".into()),
            stats,
        }
    }

    #[test]
    fn test_render_header_and_filters() {
        let out = render_distribution(&distribution(vec![entry("Janeiro/2024", 10)]));
        assert!(out.starts_with("# Distribuição Temporal\n\n**Query:** `educação`"));
        assert!(out.contains("**Granularidade:** monthly"));
        assert!(out.contains("**Total encontrado:** 12,345 notícias"));
        assert!(out.contains("*Distribuição mensal limitada a 24 períodos mais recentes*"));
        assert!(out.contains("- Ano inicial: 2024"));
        assert!(!out.contains("Ano final"));
    }

    #[test]
    fn test_render_table_and_stats() {
        let d = distribution(vec![
            entry("Semana A", 10),
            entry("Semana B", 30),
            entry("Semana C", 30),
            entry("Semana D", 5),
        ]);
        let out = render_distribution(&d);
        assert!(out.contains("| Período | Quantidade |"));
        assert!(out.contains("| Semana B | 30 |"));
        assert!(out.contains("- **Total de períodos:** 4"));
        assert!(out.contains("- **Média por período:** 19"));
        assert!(out.contains("- **Máximo:** 30 (Semana B)"));
        assert!(out.contains("- **Mínimo:** 5 (Semana D)"));
    }

    #[test]
    fn test_render_table_in_bucket_order() {
        let out = render_distribution(&distribution(vec![entry("B", 1), entry("A", 2)]));
        assert!(out.find("| B |").unwrap() < out.find("| A |").unwrap());
    }

    #[test]
    fn test_render_empty() {
        let out = render_distribution(&distribution(vec![]));
        assert!(out.ends_with("Nenhum dado encontrado para o período especificado."));
        assert!(!out.contains("## Distribuição"));
        assert!(!out.contains("## Estatísticas"));
    }

    #[test]
    fn test_render_weekly_window() {
        let mut d = distribution(vec![entry("Semana", 1)]);
        d.filters = YearFilters::default();
        let start = Sao_Paulo.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap();
        let end = Sao_Paulo.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).unwrap();
        d.window = Some((start, end));
        let out = render_distribution(&d);
        assert!(out.contains("**Janela:** 11/06/2025 a 18/06/2025"));
        assert!(!out.contains("**Filtros:**"));
    }

    #[test]
    fn test_render_backend_error() {
        let err = TemporalError {
            kind: TemporalErrorKind::Backend,
            message: "Search backend error: connection refused".into(),
            granularity: "monthly".into(),
            query: "saúde".into(),
        };
        let out = render(&Err(err));
        assert_eq!(
            out,
            "# Erro na Análise Temporal\n\n**Erro:** Search backend error: connection refused\n**Granularidade:** monthly\n**Query:** `saúde`"
        );
    }

    #[test]
    fn test_render_invalid_granularity() {
        let err = TemporalError::invalid_input("Granularidade inválida", "daily", "*");
        let out = render_error(&err);
        assert!(out.contains("Granularidade inválida: `daily`"));
        assert!(out.contains("- `yearly` - Distribuição anual"));
        assert!(out.contains("- `monthly` - Distribuição mensal (recomendado)"));
        assert!(out.contains("- `weekly` - Distribuição semanal (máx 52 semanas)"));
    }
}
