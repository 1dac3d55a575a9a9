//! Retrieval, context assembly and answer generation for one query.

use std::sync::Arc;

use recall_core::RecallError;
use recall_memory::DocumentStore;
use recall_memory::chunker::{DEFAULT_MAX_TOKENS, render_chunks, tokenize};
use recall_planner::TextGenerator;
use tracing::{debug, instrument};

/// A generated reply and the stored document it drew on, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineAnswer {
    pub text: String,
    pub document_id: Option<String>,
}

pub struct QueryPipeline {
    documents: Arc<DocumentStore>,
    generator: Arc<TextGenerator>,
    max_distance: f32,
}

impl QueryPipeline {
    pub fn new(documents: Arc<DocumentStore>, generator: Arc<TextGenerator>, max_distance: f32) -> Self {
        Self {
            documents,
            generator,
            max_distance,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn generator(&self) -> &TextGenerator {
        &self.generator
    }

    /// Answer `query` using the closest stored document and, when given, the
    /// thread history. The generator is called even when both are empty.
    #[instrument(skip_all, fields(with_history = history.is_some()))]
    pub async fn run(&self, query: &str, history: Option<&str>) -> Result<PipelineAnswer, RecallError> {
        let document_id = self.documents.retrieve_documents(query, self.max_distance).await?;
        let document = match &document_id {
            Some(id) => self.documents.get_document_content(id).await?,
            None => None,
        };

        let context = assemble_context(history.unwrap_or_default(), document.as_deref());
        let rendered = render_chunks(&tokenize(&context, DEFAULT_MAX_TOKENS));
        debug!(document_id = ?document_id, context_len = rendered.len(), "Context assembled");

        let text = self.generator.generate_answer(query, &rendered).await?;
        Ok(PipelineAnswer { text, document_id })
    }
}

/// `"{history} {document}"`, or whichever side is present.
pub fn assemble_context(history: &str, document: Option<&str>) -> String {
    match (history.is_empty(), document.filter(|d| !d.is_empty())) {
        (false, Some(doc)) => format!("{history} {doc}"),
        (false, None) => history.to_string(),
        (true, Some(doc)) => doc.to_string(),
        (true, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_memory::testing::{BrokenLookupStore, HashEmbeddings};
    use recall_memory::{Collection, InMemoryVectorStore, StopWordLanguage};
    use recall_planner::MockProvider;

    fn pipeline(provider: Arc<MockProvider>) -> QueryPipeline {
        let collection = Collection::new(
            "default",
            Arc::new(HashEmbeddings),
            Arc::new(InMemoryVectorStore::default()),
        );
        let documents = Arc::new(DocumentStore::new(collection, StopWordLanguage::Spanish));
        let generator = Arc::new(TextGenerator::new(provider, "model"));
        QueryPipeline::new(documents, generator, 0.0)
    }

    #[test]
    fn context_variants() {
        assert_eq!(assemble_context("hist", Some("doc")), "hist doc");
        assert_eq!(assemble_context("hist", None), "hist");
        assert_eq!(assemble_context("", Some("doc")), "doc");
        assert_eq!(assemble_context("", Some("")), "");
        assert_eq!(assemble_context("", None), "");
    }

    #[tokio::test]
    async fn empty_store_and_no_history_still_generates() {
        let provider = Arc::new(MockProvider::new("mock").with_response("no sé"));
        let answer = pipeline(provider.clone()).run("¿qué hora es?", None).await.unwrap();

        assert_eq!(answer, PipelineAnswer { text: "no sé".into(), document_id: None });
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_prompt, "Context: \n\nQuery: ¿qué hora es?");
    }

    #[tokio::test]
    async fn retrieved_document_and_history_reach_the_prompt() {
        let provider = Arc::new(MockProvider::new("mock"));
        let pipeline = pipeline(provider.clone());
        let ids = pipeline
            .documents()
            .store_documents(&["Reiniciar la VPN.".to_string()])
            .await
            .unwrap();

        let answer = pipeline.run("Reiniciar la VPN.", Some("Hola equipo.")).await.unwrap();
        assert_eq!(answer.document_id.as_deref(), Some(ids[0].as_str()));
        assert_eq!(
            provider.requests()[0].user_prompt,
            "Context: Hola equipo . Reiniciar la VPN .\n\nQuery: Reiniciar la VPN."
        );
    }

    #[tokio::test]
    async fn failed_document_lookup_is_an_error() {
        let provider = Arc::new(MockProvider::new("mock"));
        let collection = Collection::new(
            "default",
            Arc::new(HashEmbeddings),
            Arc::new(BrokenLookupStore::default()),
        );
        let documents = Arc::new(DocumentStore::new(collection, StopWordLanguage::Spanish));
        documents.store_documents(&["Reiniciar la VPN.".to_string()]).await.unwrap();
        let pipeline = QueryPipeline::new(documents, Arc::new(TextGenerator::new(provider.clone(), "model")), 0.0);

        let err = pipeline.run("Reiniciar la VPN.", None).await.unwrap_err();
        assert!(matches!(err, RecallError::Retrieval(_)));
        assert!(err.to_string().contains("database is locked"));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn generation_errors_propagate() {
        let provider = Arc::new(MockProvider::new("bedrock").failing("throttled"));
        let err = pipeline(provider).run("hola", None).await.unwrap_err();
        assert!(matches!(err, RecallError::Generation { .. }));
    }
}
