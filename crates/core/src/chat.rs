use crate::error::ChatError;
use crate::provider::ModelProvider;
use crate::search::SearchPipeline;
use std::io::{BufRead, Write};
use tracing::debug;

pub const EXIT_KEYWORDS: [&str; 3] = ["sair", "exit", "quit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Exit,
    Question(String),
}

pub fn classify_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ChatInput::Empty
    } else if EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        ChatInput::Exit
    } else {
        ChatInput::Question(trimmed.to_string())
    }
}

/// Reads questions until an exit keyword or end of input and answers each one
/// with a fresh retrieval. Returns how many questions were answered.
pub async fn run_chat<R, W>(
    mut input: R,
    output: &mut W,
    pipeline: &SearchPipeline<'_>,
    llm: &dyn ModelProvider,
) -> Result<usize, ChatError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Faça sua pergunta (digite 'sair' para encerrar):\n")?;
    let mut answered = 0;

    loop {
        write!(output, "PERGUNTA: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            writeln!(output, "Encerrando.")?;
            break;
        }

        let question = match classify_input(&line) {
            ChatInput::Empty => {
                writeln!(output, "Digite uma pergunta válida.\n")?;
                continue;
            }
            ChatInput::Exit => {
                writeln!(output, "Encerrando.")?;
                break;
            }
            ChatInput::Question(question) => question,
        };

        let prompt = pipeline.search_prompt(&question).await?;
        let answer = llm.chat(&prompt).await?;
        answered += 1;
        debug!(answered, "question answered");

        writeln!(output, "RESPOSTA: {}\n", answer.trim())?;
    }

    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fakes::{hits, FakeProvider, FakeStore};
    use std::io::Cursor;

    #[test]
    fn exit_keywords_match_in_any_case() {
        for keyword in ["sair", "SAIR", "Exit", "  quit  ", "QuIt"] {
            assert_eq!(classify_input(keyword), ChatInput::Exit);
        }
        assert_eq!(classify_input(" \n"), ChatInput::Empty);
        assert_eq!(
            classify_input("  sair do prédio?\n"),
            ChatInput::Question("sair do prédio?".to_string())
        );
    }

    #[tokio::test]
    async fn exit_keyword_stops_without_calling_the_llm() {
        let provider = FakeProvider::default();
        let store = FakeStore::default();
        let pipeline = SearchPipeline::new(&provider, &store);
        let mut output = Vec::new();

        let answered = run_chat(Cursor::new("SAIR\nignored\n"), &mut output, &pipeline, &provider)
            .await
            .unwrap();

        assert_eq!(answered, 0);
        assert!(provider.prompts.lock().unwrap().is_empty());
        assert!(String::from_utf8(output).unwrap().ends_with("Encerrando.\n"));
    }

    #[tokio::test]
    async fn empty_lines_reprompt_without_calling_the_llm() {
        let provider = FakeProvider::default();
        let store = FakeStore::default();
        let pipeline = SearchPipeline::new(&provider, &store);
        let mut output = Vec::new();

        let answered = run_chat(Cursor::new("\n   \nexit\n"), &mut output, &pipeline, &provider)
            .await
            .unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(answered, 0);
        assert_eq!(printed.matches("Digite uma pergunta válida.").count(), 2);
        assert_eq!(printed.matches("PERGUNTA: ").count(), 3);
        assert!(provider.prompts.lock().unwrap().is_empty());
        assert!(store.requested_k.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn each_question_gets_a_fresh_retrieval_and_trimmed_answer() {
        let provider = FakeProvider {
            answer: "  O faturamento foi de 10 milhões.  \n".to_string(),
            ..FakeProvider::default()
        };
        let store = FakeStore {
            hits: hits(3),
            ..FakeStore::default()
        };
        let pipeline = SearchPipeline::new(&provider, &store);
        let mut output = Vec::new();

        let answered = run_chat(
            Cursor::new("Qual o faturamento?\nE o lucro?\nquit\n"),
            &mut output,
            &pipeline,
            &provider,
        )
        .await
        .unwrap();

        assert_eq!(answered, 2);
        assert_eq!(store.requested_k.lock().unwrap().len(), 2);

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Qual o faturamento?"));
        assert!(prompts[1].contains("E o lucro?"));
        assert!(prompts[1].contains("trecho 0\n\ntrecho 1\n\ntrecho 2"));

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("RESPOSTA: O faturamento foi de 10 milhões.\n"));
    }

    #[tokio::test]
    async fn end_of_input_ends_the_loop() {
        let provider = FakeProvider::default();
        let store = FakeStore::default();
        let pipeline = SearchPipeline::new(&provider, &store);
        let mut output = Vec::new();

        let answered = run_chat(Cursor::new(""), &mut output, &pipeline, &provider)
            .await
            .unwrap();
        assert_eq!(answered, 0);
    }
}
