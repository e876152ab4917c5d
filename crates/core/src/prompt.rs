use crate::models::ScoredChunk;

pub const CONTEXT_SEPARATOR: &str = "\n\n";

pub const SEARCH_PROMPT_TEMPLATE: &str = r#"CONTEXTO:
{contexto}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "Não tenho informações necessárias para responder sua pergunta."
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

PERGUNTA DO USUÁRIO:
{pergunta}

RESPONDA A "PERGUNTA DO USUÁRIO""#;

/// Joins the retrieved texts in the order the store returned them.
pub fn build_context(results: &[ScoredChunk]) -> String {
    results
        .iter()
        .map(|result| result.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

pub fn build_prompt(context: &str, question: &str) -> String {
    // The question goes in first, so `{pergunta}` inside retrieved context is never replaced.
    SEARCH_PROMPT_TEMPLATE
        .replacen("{pergunta}", question, 1)
        .replacen("{contexto}", context, 1)
}
