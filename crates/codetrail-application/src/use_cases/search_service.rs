//! Semantic retrieval use case: keyword-frequency embeddings over symbol
//! descriptions, ranked by cosine similarity.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use codetrail_domain::entities::{Embedding, FileId, ProjectId, SearchQuery};
use codetrail_domain::error::Result;
use codetrail_domain::now_epoch_secs;
use codetrail_domain::ports::{
    EmbeddingRepository, FileRepository, ProjectRepository, SearchHistoryRepository, SymbolRepository,
};
use codetrail_providers::embedding::{build_description, code_snippet, embed, leading_comment, KEYWORDS};
use tracing::warn;

use crate::dto::{SearchHit, SearchStats};

/// Number of queries `stats()` reports back in `recent_queries`.
const RECENT_QUERIES_LIMIT: usize = 10;

/// Builds and queries the embedding index.
pub struct SearchService {
    embeddings: Arc<dyn EmbeddingRepository>,
    symbols: Arc<dyn SymbolRepository>,
    files: Arc<dyn FileRepository>,
    projects: Arc<dyn ProjectRepository>,
    history: Arc<dyn SearchHistoryRepository>,
}

impl SearchService {
    /// Build the service over its five repository ports.
    #[must_use]
    pub fn new(
        embeddings: Arc<dyn EmbeddingRepository>,
        symbols: Arc<dyn SymbolRepository>,
        files: Arc<dyn FileRepository>,
        projects: Arc<dyn ProjectRepository>,
        history: Arc<dyn SearchHistoryRepository>,
    ) -> Self {
        Self { embeddings, symbols, files, projects, history }
    }

    /// Recompute and upsert an embedding for every symbol in `project_id`.
    /// Idempotent: the same symbol content always yields the same vector.
    ///
    /// Description construction reads each symbol's owning file from disk to
    /// pull a leading doc comment and a clamped source snippet; a file that
    /// can no longer be read is skipped with a warning rather than failing
    /// the whole pass.
    pub async fn index_embeddings(&self, project_id: ProjectId) -> Result<usize> {
        let project = self.projects.get(project_id).await?;
        let symbols = self.symbols.list_by_project(project_id).await?;

        let mut lines_by_file: HashMap<FileId, Vec<String>> = HashMap::new();
        let mut indexed = 0;

        for symbol in &symbols {
            let Some(file) = self.files.get(symbol.file_id).await? else {
                continue;
            };

            if !lines_by_file.contains_key(&symbol.file_id) {
                match self.read_lines(&project.path, &file.path).await {
                    Some(lines) => {
                        lines_by_file.insert(symbol.file_id, lines);
                    }
                    None => {
                        warn!(path = %file.path, "failed to read file for embedding, skipping symbol");
                        continue;
                    }
                }
            }
            let lines = &lines_by_file[&symbol.file_id];
            let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();

            let comment = leading_comment(&line_refs, symbol.start_line);
            let snippet = code_snippet(&line_refs, symbol.start_line, symbol.end_line);
            let description = build_description(
                &symbol.kind.to_string(),
                &symbol.name,
                symbol.detail.as_deref(),
                comment.as_deref(),
                &file.path,
            );
            let vector = embed(&description);
            let embedding = Embedding::new(symbol.id, symbol.file_id, description, vector, Some(snippet));
            self.embeddings.upsert(&embedding).await?;
            indexed += 1;
        }
        Ok(indexed)
    }

    async fn read_lines(&self, project_path: &str, relative_path: &str) -> Option<Vec<String>> {
        let absolute = Path::new(project_path).join(relative_path);
        let content = tokio::fs::read_to_string(&absolute).await.ok()?;
        Some(content.lines().map(str::to_owned).collect())
    }

    /// Rank every embedding in `project_id` against `query` by cosine
    /// similarity, returning the top `limit` hits, highest score first.
    pub async fn search(&self, project_id: ProjectId, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.history
            .record(&SearchQuery::new(project_id, query, now_epoch_secs()))
            .await?;
        let query_vector = embed(query);
        let embeddings = self.embeddings.list_by_project(project_id).await?;

        let mut hits = Vec::with_capacity(embeddings.len());
        for embedding in &embeddings {
            let score = embedding.cosine_similarity(&query_vector);
            let symbol = self.symbols.get(embedding.symbol_id).await?;
            let file = self.files.get(embedding.file_id).await?;
            let (symbol_name, symbol_kind) = symbol
                .map(|s| (s.name, s.kind.to_string()))
                .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string()));
            let file_path = file.map(|f| f.path).unwrap_or_default();
            hits.push(SearchHit {
                file_path,
                symbol_name,
                symbol_kind,
                description: embedding.description.clone(),
                code_snippet: embedding.code_snippet.clone(),
                score,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.file_path.cmp(&b.file_path))
                .then_with(|| a.symbol_name.cmp(&b.symbol_name))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    /// Aggregate counters for the embedding index of a project.
    pub async fn stats(&self, project_id: ProjectId) -> Result<SearchStats> {
        let embeddings = self.embeddings.list_by_project(project_id).await?;
        let total_searches = self.history.count_for_project(project_id).await?;
        let recent_queries = self.history.recent_for_project(project_id, RECENT_QUERIES_LIMIT).await?;
        Ok(SearchStats {
            total_embeddings: embeddings.len(),
            vector_length: KEYWORDS.len(),
            total_searches,
            recent_queries,
        })
    }
}
