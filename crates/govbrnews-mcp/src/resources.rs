//! MCP resources over the news collection.
//!
//! | URI | Content |
//! |-----|---------|
//! | `govbrnews://stats` | Dataset totals, coverage, years and top agencies |
//! | `govbrnews://agencies` | Every agency with its document count |
//! | `govbrnews://themes` | Theme taxonomy with counts |
//! | `govbrnews://news/{news_id}` | One document in full |

use std::sync::Arc;

use chrono_tz::Tz;
use rmcp::ErrorData;
use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate};

use govbrnews_core::group_thousands;
use govbrnews_search::{FacetValue, Filter, SearchBackend, SearchParams, SortOrder, fields};

use crate::error::McpErrorExt;
use crate::format::{format_news, format_timestamp};

/// Dataset statistics.
pub const STATS_URI: &str = "govbrnews://stats";
/// Agency list.
pub const AGENCIES_URI: &str = "govbrnews://agencies";
/// Theme taxonomy.
pub const THEMES_URI: &str = "govbrnews://themes";
/// Prefix of single-document URIs.
pub const NEWS_URI_PREFIX: &str = "govbrnews://news/";

const MARKDOWN: &str = "text/markdown";

/// Reads the `govbrnews://` resources from a search backend.
#[derive(Clone)]
pub struct NewsResources {
    backend: Arc<dyn SearchBackend>,
    timezone: Tz,
}

impl NewsResources {
    /// Creates the resources over `backend`, rendering dates in `timezone`.
    pub fn new(backend: Arc<dyn SearchBackend>, timezone: Tz) -> Self {
        Self { backend, timezone }
    }

    /// Fixed resources.
    pub fn resources(&self) -> Vec<Resource> {
        [
            (STATS_URI, "stats", "Estatísticas gerais do dataset GovBRNews."),
            (
                AGENCIES_URI,
                "agencies",
                "Lista completa de agências governamentais com contagens.",
            ),
            (THEMES_URI, "themes", "Taxonomia completa de temas com contagens."),
        ]
        .into_iter()
        .map(|(uri, name, description)| {
            let mut resource = RawResource::new(uri, name);
            resource.description = Some(description.to_string());
            resource.mime_type = Some(MARKDOWN.to_string());
            resource.no_annotation()
        })
        .collect()
    }

    /// Parameterised resources.
    pub fn templates(&self) -> Vec<ResourceTemplate> {
        vec![
            RawResourceTemplate {
                uri_template: format!("{NEWS_URI_PREFIX}{{news_id}}"),
                name: "news".to_string(),
                title: None,
                description: Some("Notícia individual completa.".to_string()),
                mime_type: Some(MARKDOWN.to_string()),
                icons: None,
            }
            .no_annotation(),
        ]
    }

    /// Renders the resource at `uri` as Markdown.
    ///
    /// # Errors
    ///
    /// `resource_not_found` for unknown URIs and missing documents;
    /// `internal_error` when the collection cannot be read.
    pub async fn read(&self, uri: &str) -> Result<String, ErrorData> {
        log::info!("Reading resource {uri}");
        match uri {
            STATS_URI => self.stats().await,
            AGENCIES_URI => Ok(self.agencies().await),
            THEMES_URI => Ok(self.themes().await),
            _ => match uri.strip_prefix(NEWS_URI_PREFIX) {
                Some(id) if !id.is_empty() => self.news(id).await,
                _ => Err(ErrorData::resource_not_found(
                    format!("Unknown resource: {uri}"),
                    None,
                )),
            },
        }
    }

    // ------------------------------------------------------------------------
    // govbrnews://stats
    // ------------------------------------------------------------------------

    async fn stats(&self) -> Result<String, ErrorData> {
        let info = self.backend.collection_info().await.map_err(|e| {
            log::error!("Failed to get collection info: {e}");
            e.to_mcp_error()
        })?;

        let mut lines = vec!["# Estatísticas do Dataset GovBRNews\n".to_string()];
        lines.push(format!(
            "**Total de documentos:** {} notícias\n",
            group_thousands(info.num_documents)
        ));

        if let Some((start, end)) = self.coverage().await {
            lines.push(format!("**Período de cobertura:** {start} até {end}\n"));
        }

        match self.facet(fields::PUBLISHED_YEAR, 20).await {
            Ok(mut years) if !years.is_empty() => {
                years.sort_by(|a, b| {
                    let (ya, yb) = (a.value.parse::<i64>().ok(), b.value.parse::<i64>().ok());
                    yb.cmp(&ya).then_with(|| b.value.cmp(&a.value))
                });
                lines.push("## Distribuição por Ano\n".to_string());
                for year in years.iter().take(10) {
                    lines.push(format!(
                        "- **{}:** {} notícias",
                        year.value,
                        group_thousands(year.count)
                    ));
                }
                lines.push(String::new());
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to get year distribution: {e}"),
        }

        match self.facet(fields::AGENCY, 5).await {
            Ok(agencies) if !agencies.is_empty() => {
                lines.push("## Top 5 Agências\n".to_string());
                for (i, agency) in agencies.iter().take(5).enumerate() {
                    lines.push(format!(
                        "{}. **{}:** {} notícias",
                        i + 1,
                        agency.value,
                        group_thousands(agency.count)
                    ));
                }
                lines.push(String::new());
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to get top agencies: {e}"),
        }

        Ok(lines.join("\n"))
    }

    /// Formatted dates of the oldest and newest documents.
    async fn coverage(&self) -> Option<(String, String)> {
        let oldest = self.edge_timestamp(SortOrder::Oldest).await;
        let newest = self.edge_timestamp(SortOrder::Newest).await;
        match (oldest, newest) {
            (Ok(oldest), Ok(newest)) if oldest.is_some() || newest.is_some() => Some((
                format_timestamp(oldest, self.timezone),
                format_timestamp(newest, self.timezone),
            )),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Failed to get coverage period: {e}");
                None
            }
            _ => None,
        }
    }

    async fn edge_timestamp(&self, order: SortOrder) -> govbrnews_core::Result<Option<i64>> {
        let params = SearchParams::new("*").with_per_page(1).with_sort(order);
        let response = self.backend.search(&params).await?;
        Ok(response
            .hits
            .first()
            .and_then(|hit| hit.document.published_at))
    }

    // ------------------------------------------------------------------------
    // govbrnews://agencies and govbrnews://themes
    // ------------------------------------------------------------------------

    async fn agencies(&self) -> String {
        match self.facet(fields::AGENCY, 200).await {
            Ok(agencies) => listing(
                "# Agências Governamentais\n",
                "Total de agências",
                "## Lista de Agências (ordenado por quantidade)\n",
                &agencies,
            ),
            Err(e) => {
                log::error!("Failed to get agencies: {e}");
                "# Erro\n\nNão foi possível obter lista de agências".to_string()
            }
        }
    }

    async fn themes(&self) -> String {
        match self.facet(fields::THEME, 100).await {
            Ok(themes) => listing(
                "# Taxonomia de Temas\n",
                "Total de temas",
                "## Lista de Temas (ordenado por quantidade)\n",
                &themes,
            ),
            Err(e) => {
                log::error!("Failed to get themes: {e}");
                "# Erro\n\nNão foi possível obter taxonomia de temas".to_string()
            }
        }
    }

    // ------------------------------------------------------------------------
    // govbrnews://news/{news_id}
    // ------------------------------------------------------------------------

    async fn news(&self, id: &str) -> Result<String, ErrorData> {
        let doc = self.backend.get_document(id).await.map_err(|e| {
            log::error!("Failed to get news by ID {id}: {e}");
            e.to_mcp_error()
        })?;
        Ok(format_news(&doc, self.timezone))
    }

    /// Whole-collection histogram of `field`, in engine order.
    async fn facet(&self, field: &str, max_values: u32) -> govbrnews_core::Result<Vec<FacetValue>> {
        let response = self
            .backend
            .faceted_count("*", &[field], &Filter::new(), max_values)
            .await?;
        Ok(response
            .facet(field)
            .map(|f| f.counts.clone())
            .unwrap_or_default())
    }
}

fn listing(title: &str, total_label: &str, heading: &str, values: &[FacetValue]) -> String {
    let mut lines = vec![title.to_string()];
    lines.push(format!("**{total_label}:** {}\n", values.len()));
    if !values.is_empty() {
        lines.push(heading.to_string());
        for value in values {
            lines.push(format!(
                "- **{}:** {} notícias",
                value.value,
                group_thousands(value.count)
            ));
        }
    }
    lines.join("\n")
}
