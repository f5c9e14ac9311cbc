//! Markdown rendering of search results and documents.
//!
//! Everything the tools and resources return is Markdown meant for an LLM
//! to read. Dates are shown as `dd/mm/yyyy` in the server's time zone.

use chrono::DateTime;
use chrono_tz::Tz;

use govbrnews_core::group_thousands;
use govbrnews_core::util::text::snippet;
use govbrnews_search::{NewsDocument, SearchHit, SearchResponse, fields};

/// Characters of body text shown per search hit.
pub const SNIPPET_CHARS: usize = 500;

/// A snippet is only cut back to a word boundary past this many characters.
pub const SNIPPET_MIN_BREAK: usize = 400;

/// Formats unix seconds as `dd/mm/yyyy`; `N/A` for missing or non-positive
/// timestamps.
pub fn format_timestamp(timestamp: Option<i64>, tz: Tz) -> String {
    timestamp
        .filter(|ts| *ts > 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.with_timezone(&tz).format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Portuguese heading for a facet field.
pub fn facet_label(field: &str) -> &str {
    match field {
        fields::AGENCY => "Agências",
        fields::CATEGORY => "Categorias",
        fields::THEME => "Temas",
        fields::PUBLISHED_YEAR => "Anos",
        fields::PUBLISHED_MONTH => "Meses",
        other => other,
    }
}

/// Renders a page of search hits.
pub fn format_search_results(found: u64, hits: &[SearchHit], tz: Tz) -> String {
    let mut out = String::from("# Resultados da Busca\n\n");
    out.push_str(&format!(
        "**Total encontrado:** {} notícias\n",
        group_thousands(found)
    ));
    out.push_str(&format!("**Mostrando:** {} resultados\n\n", hits.len()));

    if hits.is_empty() {
        out.push_str("*Nenhuma notícia encontrada com os critérios especificados.*\n");
        return out;
    }

    out.push_str("---\n\n");
    for (i, hit) in hits.iter().enumerate() {
        let doc = &hit.document;
        let title = doc.title.as_deref().unwrap_or("Sem título");
        out.push_str(&format!("## {}. {title}\n\n", i + 1));

        let metadata = hit_metadata(doc, tz);
        if !metadata.is_empty() {
            out.push_str(&metadata.join(" | "));
            out.push_str("\n\n");
        }

        if let Some(content) = doc.content.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(&format!(
                "**Resumo:**\n{}\n\n",
                snippet(content, SNIPPET_CHARS, SNIPPET_MIN_BREAK)
            ));
        }

        out.push_str("---\n\n");
    }
    out
}

fn hit_metadata(doc: &NewsDocument, tz: Tz) -> Vec<String> {
    let mut metadata = Vec::new();
    if let Some(agency) = non_empty(&doc.agency) {
        metadata.push(format!("**Agência:** {agency}"));
    }
    if let Some(ts) = doc.published_at.filter(|ts| *ts != 0) {
        metadata.push(format!("**Publicado:** {}", format_timestamp(Some(ts), tz)));
    }
    if let Some(category) = non_empty(&doc.category) {
        metadata.push(format!("**Categoria:** {category}"));
    }
    if let Some(theme) = non_empty(&doc.theme) {
        metadata.push(format!("**Tema:** {theme}"));
    }
    if let Some(url) = non_empty(&doc.url) {
        metadata.push(format!("**URL:** {url}"));
    }
    metadata
}

/// Renders facet histograms, one table per field.
///
/// The query and total are shown unless the query is the `*` wildcard.
pub fn format_facets_results(response: &SearchResponse, query: &str) -> String {
    if response.facet_counts.is_empty() {
        return "Nenhuma agregação disponível.".to_string();
    }

    let mut out = String::from("# Agregações\n\n");
    if query != "*" {
        out.push_str(&format!("**Query:** `{query}`\n"));
        out.push_str(&format!(
            "**Total encontrado:** {} notícias\n\n",
            group_thousands(response.found)
        ));
    }

    for facet in &response.facet_counts {
        if facet.counts.is_empty() {
            continue;
        }
        out.push_str(&format!("## {}\n\n", facet_label(&facet.field_name)));
        out.push_str("| Item | Quantidade |\n");
        out.push_str("|------|------------|\n");
        for value in &facet.counts {
            out.push_str(&format!(
                "| {} | {} |\n",
                value.value,
                group_thousands(value.count)
            ));
        }
        out.push('\n');
    }
    out
}

/// Renders one document in full: title, metadata block and body.
pub fn format_news(doc: &NewsDocument, tz: Tz) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "# {}\n",
        doc.title.as_deref().unwrap_or("Sem título")
    ));
    lines.push("## Metadados\n".to_string());

    lines.push(format!(
        "**Agência:** {}",
        non_empty(&doc.agency).unwrap_or("N/A")
    ));
    if let Some(ts) = doc.published_at.filter(|ts| *ts != 0) {
        lines.push(format!(
            "**Data de publicação:** {}",
            format_timestamp(Some(ts), tz)
        ));
    }
    if let Some(year) = doc.published_year.filter(|y| *y != 0) {
        lines.push(format!("**Ano:** {year}"));
    }
    if let Some(category) = non_empty(&doc.category) {
        lines.push(format!("**Categoria:** {category}"));
    }
    if let Some(theme) = non_empty(&doc.theme) {
        lines.push(format!("**Tema:** {theme}"));
    }
    if let Some(url) = non_empty(&doc.url) {
        lines.push(format!("**URL:** {url}"));
    }
    if !doc.id.is_empty() {
        lines.push(format!("**ID:** `{}`", doc.id));
    }
    lines.push(String::new());

    lines.push("## Conteúdo\n".to_string());
    lines.push(
        non_empty(&doc.content)
            .unwrap_or("Conteúdo não disponível")
            .to_string(),
    );
    lines.join("\n")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
