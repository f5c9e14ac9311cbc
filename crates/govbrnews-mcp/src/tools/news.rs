//! Search, facet and similarity tools.

use std::sync::Arc;

use chrono_tz::Tz;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use govbrnews_core::util::text::truncate_chars;
use govbrnews_search::{Filter, SearchBackend, SearchParams, SortOrder, fields};

use super::{clamp_arg, make_tool, markdown, parse_args};
use crate::format::{format_facets_results, format_search_results};
use crate::registry::{ToolRegistry, ToolResult};

/// Fields `get_facets` accepts, with their descriptions.
pub const FACET_FIELDS: [(&str, &str); 4] = [
    (fields::AGENCY, "Agências governamentais"),
    (fields::PUBLISHED_YEAR, "Ano de publicação"),
    (fields::THEME, "Tema principal"),
    (fields::CATEGORY, "Categoria da notícia"),
];

// ---------------------------------------------------------------------------
// Argument types
// ---------------------------------------------------------------------------

/// Arguments for `search_news`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchNewsArgs {
    /// Search terms, e.g. "educação" or "saúde pública".
    pub query: String,
    /// Agencies to filter by, e.g. ["Ministério da Educação"].
    pub agencies: Option<Vec<String>>,
    /// First publication year (inclusive).
    pub year_from: Option<i32>,
    /// Last publication year (inclusive).
    pub year_to: Option<i32>,
    /// Themes to filter by, e.g. ["Educação e Cultura"].
    pub themes: Option<Vec<String>>,
    /// Maximum number of results (1-100, default 10).
    pub limit: Option<i64>,
    /// Ordering: "relevant" (default), "newest" or "oldest".
    #[schemars(with = "Option<String>")]
    pub sort: Option<SortOrder>,
}

/// Arguments for `get_facets`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFacetsArgs {
    /// Fields to aggregate: agency, published_year, theme_1_level_1, category.
    pub facet_fields: Vec<String>,
    /// Optional query restricting the documents counted (default "*").
    pub query: Option<String>,
    /// Maximum values per facet (1-100, default 20).
    pub max_values: Option<i64>,
}

/// Arguments for `similar_news`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SimilarNewsArgs {
    /// ID of the reference document.
    pub reference_id: String,
    /// Maximum number of similar documents (1-20, default 5).
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// NewsTools
// ---------------------------------------------------------------------------

/// Tools querying the news collection directly.
#[derive(Clone)]
pub struct NewsTools {
    backend: Arc<dyn SearchBackend>,
    timezone: Tz,
}

impl NewsTools {
    /// Creates the tools over `backend`, rendering dates in `timezone`.
    pub fn new(backend: Arc<dyn SearchBackend>, timezone: Tz) -> Self {
        Self { backend, timezone }
    }
}

impl ToolRegistry for NewsTools {
    fn tools(&self) -> Vec<Tool> {
        vec![
            make_tool::<SearchNewsArgs>(
                "search_news",
                "Busca notícias governamentais brasileiras no dataset GovBRNews. \
                 Retorna o total encontrado e a lista de notícias com título, agência, \
                 data, resumo e link. Filtros opcionais por agências, temas e período.",
            ),
            make_tool::<GetFacetsArgs>(
                "get_facets",
                "Obtém agregações e estatísticas por campos específicos: quantas notícias \
                 cada agência publicou, distribuição por tema, volume por ano e categorias \
                 mais comuns.",
            ),
            make_tool::<SimilarNewsArgs>(
                "similar_news",
                "Encontra notícias similares a uma notícia de referência \
                 (mesma agência, mesmo tema, período próximo).",
            ),
        ]
    }

    fn call(&self, name: &str, args: Value) -> Option<ToolResult> {
        let backend = Arc::clone(&self.backend);
        let tz = self.timezone;

        match name {
            "search_news" => Some(Box::pin(async move {
                let args: SearchNewsArgs = parse_args(args)?;
                markdown(search_news(backend.as_ref(), args, tz).await)
            })),

            "get_facets" => Some(Box::pin(async move {
                let args: GetFacetsArgs = parse_args(args)?;
                markdown(get_facets(backend.as_ref(), args).await)
            })),

            "similar_news" => Some(Box::pin(async move {
                let args: SimilarNewsArgs = parse_args(args)?;
                markdown(similar_news(backend.as_ref(), args, tz).await)
            })),

            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// search_news
// ---------------------------------------------------------------------------

/// Builds the search request for `search_news`.
pub fn search_params(args: &SearchNewsArgs) -> SearchParams {
    let filter = Filter::new()
        .any_of(fields::AGENCY, args.agencies.iter().flatten())
        .between(
            fields::PUBLISHED_YEAR,
            args.year_from.map(i64::from),
            args.year_to.map(i64::from),
        )
        .any_of(fields::THEME, args.themes.iter().flatten());

    SearchParams::new(&args.query)
        .with_filter(&filter)
        .with_per_page(clamp_arg("limit", args.limit.unwrap_or(10), 1, 100))
        .with_sort(args.sort.unwrap_or_default())
}

async fn search_news(backend: &dyn SearchBackend, args: SearchNewsArgs, tz: Tz) -> String {
    log::info!(
        "Searching for: '{}' with filters - agencies: {:?}, year_from: {:?}, year_to: {:?}, themes: {:?}",
        args.query,
        args.agencies,
        args.year_from,
        args.year_to,
        args.themes
    );

    match backend.search(&search_params(&args)).await {
        Ok(response) => {
            log::info!("Search completed: found {} results", response.found);
            format_search_results(response.found, &response.hits, tz)
        }
        Err(e) => {
            log::error!("Search failed: {e}");
            format!(
                "Erro ao buscar notícias: {e}\n\n\
                 Verifique se o servidor Typesense está rodando e acessível."
            )
        }
    }
}

// ---------------------------------------------------------------------------
// get_facets
// ---------------------------------------------------------------------------

async fn get_facets(backend: &dyn SearchBackend, args: GetFacetsArgs) -> String {
    let query = args.query.as_deref().unwrap_or("*");

    let mut invalid: Vec<&str> = Vec::new();
    for field in &args.facet_fields {
        let known = FACET_FIELDS.iter().any(|(name, _)| *name == field.as_str());
        if !known && !invalid.contains(&field.as_str()) {
            invalid.push(field);
        }
    }
    if !invalid.is_empty() {
        let mut out = format!(
            "# Erro\n\nCampos inválidos: {}\n\n**Campos válidos:**",
            invalid.join(", ")
        );
        for (name, description) in FACET_FIELDS {
            out.push_str(&format!("\n- `{name}` - {description}"));
        }
        return out;
    }

    let max_values = clamp_arg("max_values", args.max_values.unwrap_or(20), 1, 100);

    if args.facet_fields.is_empty() {
        return "# Erro\n\nNenhum campo de facet especificado. \
                Forneça ao menos um campo válido."
            .to_string();
    }

    let requested = args.facet_fields.join(", ");
    let facet_fields: Vec<&str> = args.facet_fields.iter().map(String::as_str).collect();
    log::info!(
        "Executing facets query: fields={facet_fields:?}, query='{query}', max={max_values}"
    );

    match backend
        .faceted_count(query, &facet_fields, &Filter::new(), max_values)
        .await
    {
        Ok(response) if response.facet_counts.is_empty() => format!(
            "# Agregações\n\n**Query:** `{query}`\n**Campos:** {requested}\n\n\
             Nenhuma agregação encontrada."
        ),
        Ok(response) => format_facets_results(&response, query),
        Err(e) => {
            log::error!("Error getting facets: {e}");
            format!(
                "# Erro ao Obter Agregações\n\n**Erro:** {e}\n\n**Query:** `{query}`\n\
                 **Campos solicitados:** {requested}\n\n\
                 Verifique se os campos são válidos e tente novamente."
            )
        }
    }
}

// ---------------------------------------------------------------------------
// similar_news
// ---------------------------------------------------------------------------

async fn similar_news(backend: &dyn SearchBackend, args: SimilarNewsArgs, tz: Tz) -> String {
    let limit = clamp_arg("limit", args.limit.unwrap_or(5), 1, 20);
    let reference_id = args.reference_id.as_str();

    log::info!("Fetching reference document: {reference_id}");
    let reference = match backend.get_document(reference_id).await {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Failed to get reference document {reference_id}: {e}");
            return format!(
                "# Erro\n\nNotícia com ID `{reference_id}` não encontrada.\n\n\
                 Verifique se o ID está correto e tente novamente."
            );
        }
    };

    let agency = reference.agency.as_deref().filter(|a| !a.is_empty());
    let theme = reference.theme.as_deref().filter(|t| !t.is_empty());
    let year = reference.published_year.filter(|y| *y != 0);
    let title = truncate_chars(reference.title.as_deref().unwrap_or_default(), 80);
    log::info!("Reference doc: agency={agency:?}, theme={theme:?}, year={year:?}");

    let mut filter = Filter::new();
    if let Some(agency) = agency {
        filter = filter.matches(fields::AGENCY, agency);
    }
    if let Some(theme) = theme {
        filter = filter.matches(fields::THEME, theme);
    }
    if filter.is_empty()
        && let Some(year) = year
    {
        let year = i64::from(year);
        filter = filter.between(fields::PUBLISHED_YEAR, Some(year - 1), Some(year + 1));
    }

    let params = SearchParams::new("*")
        .with_filter(&filter)
        .with_per_page(limit + 1)
        .with_sort(SortOrder::Newest);
    log::info!("Searching similar news with filter: {:?}", params.filter_by);

    let response = match backend.search(&params).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Error finding similar news: {e}");
            return format!(
                "# Erro ao Buscar Notícias Similares\n\n**Erro:** {e}\n\n\
                 **ID de referência:** `{reference_id}`\n\n\
                 Ocorreu um erro ao buscar notícias similares. Tente novamente."
            );
        }
    };

    let similar: Vec<_> = response
        .hits
        .into_iter()
        .filter(|hit| hit.document.id != reference_id)
        .take(limit as usize)
        .collect();

    let agency = agency.unwrap_or("N/A");
    let theme = theme.unwrap_or("N/A");
    let year = year.map_or_else(|| "N/A".to_string(), |y| y.to_string());

    if similar.is_empty() {
        return format!(
            "# Notícias Similares\n\n**Notícia de referência:** {title}...\n\
             **ID:** `{reference_id}`\n\n\
             Nenhuma notícia similar encontrada com os critérios:\n\
             - Agência: {agency}\n- Tema: {theme}\n- Ano: {year}"
        );
    }

    let header = format!(
        "# Notícias Similares\n\n**Notícia de referência:** {title}...\n\
         **ID:** `{reference_id}`\n**Agência:** {agency}\n**Tema:** {theme}\n**Ano:** {year}\n\n\
         **Critério de similaridade:** Mesma agência e/ou tema\n\
         **Encontrado:** {} notícias similares\n\n---\n\n",
        similar.len()
    );
    header + &format_search_results(similar.len() as u64, &similar, tz)
}

// ============================================================================
// Tests
// ============================================================================
