//! Guided-analysis prompts.
//!
//! Each prompt expands into a single user message: a step-by-step script
//! telling the assistant which tools and resources to combine.

use rmcp::ErrorData;
use rmcp::model::{
    GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
};
use serde_json::Value;

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument::new(name.to_string())
        .with_description(description.to_string())
        .with_required(required)
}

/// Prompts offered by the server.
pub fn list() -> Vec<Prompt> {
    vec![
        Prompt::new(
            "analyze_theme",
            Some("Análise completa de um tema específico no dataset GovBRNews."),
            Some(vec![argument(
                "theme",
                "Tema a ser analisado (ex: \"educação\", \"saúde\", \"meio ambiente\")",
                true,
            )]),
        ),
        Prompt::new(
            "compare_agencies",
            Some("Comparação detalhada entre múltiplas agências governamentais."),
            Some(vec![
                argument(
                    "agencies",
                    "Agências a comparar, separadas por vírgula (ex: \"MEC, MMA, MS\")",
                    true,
                ),
                argument(
                    "theme",
                    "Tema específico para comparação (opcional, padrão: todas as notícias)",
                    false,
                ),
            ]),
        ),
        Prompt::new(
            "temporal_evolution",
            Some("Análise de evolução temporal de um tema com múltiplas granularidades."),
            Some(vec![
                argument("query", "Termo de busca para análise temporal", true),
                argument("year_from", "Ano inicial da análise (opcional)", false),
                argument("year_to", "Ano final da análise (opcional)", false),
            ]),
        ),
        Prompt::new(
            "discover_context",
            Some("Descoberta do contexto completo em torno de uma notícia específica."),
            Some(vec![argument("news_id", "ID da notícia no Typesense", true)]),
        ),
    ]
}

/// Expands the prompt `name` with `arguments`.
///
/// # Errors
///
/// `invalid_params` for an unknown prompt, a missing required argument or a
/// year that is not a number.
pub fn get(name: &str, arguments: Option<&JsonObject>) -> Result<GetPromptResult, ErrorData> {
    let args = Args(arguments);
    let (description, text) = match name {
        "analyze_theme" => (
            "Análise completa de um tema específico no dataset GovBRNews.",
            analyze_theme(&args.required("theme")?),
        ),
        "compare_agencies" => {
            let agencies: Vec<String> = args
                .required("agencies")?
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            if agencies.is_empty() {
                return Err(ErrorData::invalid_params(
                    "Argument 'agencies' must name at least one agency",
                    None,
                ));
            }
            let theme = args.optional("theme").unwrap_or_else(|| "*".to_string());
            (
                "Comparação detalhada entre múltiplas agências governamentais.",
                compare_agencies(&agencies, &theme),
            )
        }
        "temporal_evolution" => (
            "Análise de evolução temporal de um tema com múltiplas granularidades.",
            temporal_evolution(
                &args.required("query")?,
                args.year("year_from")?,
                args.year("year_to")?,
            ),
        ),
        "discover_context" => (
            "Descoberta do contexto completo em torno de uma notícia específica.",
            discover_context(&args.required("news_id")?),
        ),
        _ => {
            return Err(ErrorData::invalid_params(
                format!("Unknown prompt: {name}"),
                None,
            ));
        }
    };

    Ok(GetPromptResult::new(vec![PromptMessage::new_text(
        PromptMessageRole::User,
        text,
    )])
    .with_description(description.to_string()))
}

/// Prompt arguments as strings; numbers are accepted and stringified.
struct Args<'a>(Option<&'a JsonObject>);

impl Args<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        let value = self.0?.get(key)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Null => return None,
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    fn required(&self, key: &str) -> Result<String, ErrorData> {
        self.optional(key).ok_or_else(|| {
            ErrorData::invalid_params(format!("Missing required argument '{key}'"), None)
        })
    }

    fn year(&self, key: &str) -> Result<Option<i32>, ErrorData> {
        self.optional(key)
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    ErrorData::invalid_params(
                        format!("Argument '{key}' must be a year, got '{raw}'"),
                        None,
                    )
                })
            })
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

fn analyze_theme(theme: &str) -> String {
    format!(
        r#"Realize uma análise completa e detalhada sobre o tema: **{theme}**

Siga este roteiro de análise:

## 1. Visão Geral
- Use `search_news` para obter volume total de notícias sobre "{theme}"
- Use `analyze_temporal` com granularidade mensal para mostrar evolução nos últimos 12-24 meses
- Identifique tendências: crescimento, queda, sazonalidade

## 2. Análise por Agências
- Use `get_facets` com campo "agency" para identificar top 10 agências que mais publicam sobre "{theme}"
- Analise a distribuição: há concentração ou diversidade?
- Destaque agências principais e seus volumes

## 3. Análise Temática
- Use `get_facets` com campo "theme_1_level_1" para identificar temas relacionados
- Mostre quais sub-temas ou temas correlatos são mais frequentes
- Identifique conexões interessantes

## 4. Análise Temporal Detalhada
- Use `analyze_temporal` com granularidade semanal para últimas 8 semanas
- Identifique picos recentes e possíveis causas
- Compare com mesmo período do ano anterior (se aplicável)

## 5. Notícias Mais Relevantes
- Use `search_news` para obter top 5 notícias mais relevantes sobre "{theme}"
- Ordene por relevância
- Resuma principais manchetes e insights

## 6. Síntese e Insights
- Resuma os principais achados
- Identifique padrões interessantes
- Sugira possíveis análises de aprofundamento
- Contextualize os dados (se houver conhecimento sobre eventos relevantes)

**Importante:** Use todos os tools disponíveis para criar uma análise rica e multifacetada."#
    )
}

fn compare_agencies(agencies: &[String], theme: &str) -> String {
    let agencies = agencies.join(", ");
    let theme_filter = if theme == "*" {
        String::new()
    } else {
        format!(" sobre **{theme}**")
    };

    format!(
        r#"Realize uma comparação detalhada entre as agências: **{agencies}**{theme_filter}

Siga este roteiro de análise comparativa:

## 1. Volumes Globais
Para cada agência ({agencies}):
- Use `search_news` com filtro de agency para obter volume total{theme_filter}
- Compare os volumes absolutos
- Calcule percentuais relativos

## 2. Distribuição Temporal
- Use `analyze_temporal` (granularidade mensal, últimos 12 meses) para CADA agência separadamente
- Compare as evoluções temporais
- Identifique padrões divergentes ou convergentes
- Há períodos onde uma agência aumenta e outra diminui?

## 3. Distribuição Temática
- Use `get_facets` com campo "theme_1_level_1" para CADA agência
- Compare os temas que cada agência mais aborda
- Identifique especializações e sobreposições
- Quais temas são exclusivos de cada agência?

## 4. Análise Recente (Últimas 8 Semanas)
- Use `analyze_temporal` (granularidade semanal) para CADA agência
- Identifique agência mais ativa recentemente
- Compare ritmo de publicação

## 5. Categorias de Publicação
- Use `get_facets` com campo "category" para CADA agência
- Compare tipos de publicação (notícias, artigos, releases, etc)
- Identifique diferenças de estilo/formato

## 6. Notícias Representativas
- Use `search_news` para obter 3 notícias mais relevantes de CADA agência{theme_filter}
- Mostre exemplos concretos de cobertura de cada agência
- Identifique diferenças de abordagem

## 7. Síntese Comparativa
- Resuma semelhanças e diferenças
- Identifique especializações de cada agência
- Sugira possíveis razões para diferenças observadas
- Recomende análises de aprofundamento

**Importante:** Faça análises paralelas para permitir comparação direta entre agências."#
    )
}

fn temporal_evolution(query: &str, year_from: Option<i32>, year_to: Option<i32>) -> String {
    let years_filter = match (year_from, year_to) {
        (Some(from), Some(to)) => format!(" entre **{from}** e **{to}**"),
        (Some(from), None) => format!(" desde **{from}**"),
        (None, Some(to)) => format!(" até **{to}**"),
        (None, None) => String::new(),
    };
    let yearly_scope = if years_filter.is_empty() {
        " (todos os anos disponíveis)"
    } else {
        years_filter.as_str()
    };

    format!(
        r#"Realize uma análise temporal completa sobre: **{query}**{years_filter}

Siga este roteiro de análise temporal em múltiplas escalas:

## 1. Tendência de Longo Prazo (Anual)
- Use `analyze_temporal` com granularidade **yearly**{yearly_scope}
- Identifique tendência geral: crescimento, estabilidade ou queda
- Calcule taxa de crescimento anual
- Identifique anos de pico e vale
- Contextualize com possíveis eventos (se conhecidos)

## 2. Padrões de Médio Prazo (Mensal)
- Use `analyze_temporal` com granularidade **monthly** para últimos 24 meses
- Identifique sazonalidade: há meses com mais/menos publicações?
- Compare mesmo mês em anos diferentes
- Identifique mudanças de ritmo ao longo do ano

## 3. Dinâmica Recente (Semanal)
- Use `analyze_temporal` com granularidade **weekly** para últimas 12 semanas
- Identifique picos e vales recentes
- Compare com média histórica
- Detecte eventos ou mudanças súbitas

## 4. Análise de Agências ao Longo do Tempo
- Use `get_facets` com campo "agency" para identificar top 5 agências
- Para cada top agência, analise evolução temporal separadamente
- Identifique mudanças na composição: agências que aumentaram/diminuíram relevância

## 5. Evolução Temática
- Use `get_facets` com campo "theme_1_level_1"
- Compare distribuição temática em períodos diferentes
- Identifique temas emergentes vs temas em declínio
- Use `search_news` com filtros temporais para comparar períodos

## 6. Análise de Momentos Críticos
- Identifique os 3 períodos de maior volume
- Identifique os 3 períodos de menor volume
- Para cada momento crítico, use `search_news` para obter notícias representativas
- Tente identificar causas dos picos/vales

## 7. Projeção e Tendências
- Com base nos dados históricos, qual a tendência?
- Há sinais de aceleração ou desaceleração?
- Que eventos futuros podem impactar o tema?

## 8. Síntese Temporal
- Resuma a narrativa temporal completa
- Destaque inflexões importantes
- Identifique padrões cíclicos ou únicos
- Sugira hipóteses para variações observadas

**Importante:** Combine as três granularidades (yearly, monthly, weekly) para construir uma visão temporal completa e multi-escala."#
    )
}

fn discover_context(news_id: &str) -> String {
    format!(
        r#"Realize uma investigação contextual completa sobre a notícia com ID: **{news_id}**

Siga este roteiro de descoberta contextual:

## 1. Notícia de Referência
- Use resource `govbrnews://news/{news_id}` para obter dados completos da notícia
- Extraia: título, agência, data, tema principal, conteúdo
- Resuma a notícia de referência

## 2. Notícias Similares
- Use `similar_news` com ID da notícia de referência
- Analise as 5-10 notícias mais similares
- Identifique: mesma agência? mesmo tema? mesmo período?
- Há uma narrativa conectando essas notícias?

## 3. Contexto Temporal
- Com base na data da notícia, use `search_news` para buscar notícias sobre o mesmo tema:
  - 1 semana antes da publicação
  - Na mesma semana
  - 1 semana depois
- Monte uma linha do tempo contextual

## 4. Contexto Temático Amplo
- Use o tema principal da notícia
- Use `analyze_temporal` (monthly) para entender evolução do tema nos últimos 6 meses
- A notícia ocorre em período de pico ou vale?
- Use `get_facets` para entender landscape temático

## 5. Contexto da Agência
- Use `search_news` com filtro da agência da notícia
- Busque outras notícias recentes da mesma agência (últimas 2 semanas)
- Identifique prioridades recentes da agência
- A notícia faz parte de uma campanha/série?

## 6. Reações e Desdobramentos
- Use `search_news` com termos-chave da notícia original
- Filtre por datas APÓS a publicação
- Identifique notícias que podem ser desdobramentos ou reações
- Houve cobertura subsequente?

## 7. Contexto Histórico
- Use `search_news` com termos-chave para buscar no arquivo histórico
- Identifique primeira menção ao tema
- Identifique marcos importantes relacionados
- Monte histórico resumido

## 8. Síntese Contextual
- Resuma o contexto completo da notícia:
  - Por que foi publicada neste momento?
  - Qual o contexto temático mais amplo?
  - Há uma narrativa maior em jogo?
  - Qual a relevância desta notícia no panorama geral?

**Importante:** Use todos os tools e resources disponíveis para construir contexto rico e multidimensional."#
    )
}
