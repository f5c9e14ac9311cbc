//! The `analyze_temporal` tool.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use govbrnews_temporal::{TemporalAggregator, TemporalRequest, presenter};

use super::{make_tool, markdown, parse_args};
use crate::registry::{ToolRegistry, ToolResult};

/// Arguments for `analyze_temporal`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeTemporalArgs {
    /// Search terms; "*" or empty analyses the whole dataset.
    pub query: String,
    /// "yearly", "monthly" (default) or "weekly".
    pub granularity: Option<String>,
    /// First year considered (inclusive).
    pub year_from: Option<i32>,
    /// Last year considered (inclusive).
    pub year_to: Option<i32>,
    /// Number of most recent periods (default 24; capped at 50 years, 60 months or 52 weeks).
    pub max_periods: Option<i64>,
}

impl AnalyzeTemporalArgs {
    /// The request handed to the aggregator.
    pub fn to_request(&self) -> TemporalRequest {
        let mut request = TemporalRequest::new(
            self.query.clone(),
            self.granularity.as_deref().unwrap_or("monthly"),
        )
        .with_years(self.year_from, self.year_to);
        if let Some(max_periods) = self.max_periods {
            request = request.with_max_periods(max_periods);
        }
        request
    }
}

/// Temporal distribution tool backed by a [`TemporalAggregator`].
#[derive(Clone)]
pub struct TemporalTools {
    aggregator: TemporalAggregator,
}

impl TemporalTools {
    /// Creates the tool over `aggregator`.
    pub fn new(aggregator: TemporalAggregator) -> Self {
        Self { aggregator }
    }
}

impl ToolRegistry for TemporalTools {
    fn tools(&self) -> Vec<Tool> {
        vec![make_tool::<AnalyzeTemporalArgs>(
            "analyze_temporal",
            "Analisa a distribuição temporal de notícias sobre um tema. \
             Granularidades: yearly (distribuição anual), monthly (mensal, recomendado) \
             e weekly (semanal, máx 52 semanas). Retorna tabela por período e estatísticas \
             (média, máximo e mínimo).",
        )]
    }

    fn call(&self, name: &str, args: Value) -> Option<ToolResult> {
        if name != "analyze_temporal" {
            return None;
        }

        let aggregator = self.aggregator.clone();
        Some(Box::pin(async move {
            let args: AnalyzeTemporalArgs = parse_args(args)?;
            let outcome = aggregator.analyze(&args.to_request()).await;
            markdown(presenter::render(&outcome))
        }))
    }
}
