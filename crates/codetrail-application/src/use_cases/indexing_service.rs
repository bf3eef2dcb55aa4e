//! Incremental code index use case.
//!
//! Coordinates the file walker, content hasher, LSP extraction (with regex
//! fallback) and the file/symbol repositories to keep a project's symbol
//! table in sync with its contents on disk.

use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use codetrail_domain::entities::{FileRecord, Project, ProjectId, Symbol};
use codetrail_domain::error::Result;
use codetrail_domain::now_epoch_secs;
use codetrail_domain::ports::{FileRepository, ProjectRepository, SymbolRepository};
use codetrail_infrastructure::lsp::LspRegistry;
use codetrail_infrastructure::{fallback, hasher, walker};
use codetrail_providers::language;
use tracing::{info, warn};

use crate::dto::{AnalysisReport, FileHash, StructureSummary};

/// Classification of a walked file against the previously stored records.
enum Classification {
    New,
    Changed,
    Unchanged,
}

/// Drives `analyze`, `file_outline`, `project_structure` and `hash_tree`.
pub struct IndexingService {
    projects: Arc<dyn ProjectRepository>,
    files: Arc<dyn FileRepository>,
    symbols: Arc<dyn SymbolRepository>,
}

impl IndexingService {
    /// Build the service over its three repository ports.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        files: Arc<dyn FileRepository>,
        symbols: Arc<dyn SymbolRepository>,
    ) -> Self {
        Self { projects, files, symbols }
    }

    /// Register (or refresh) a project rooted at `path`.
    pub async fn open_project(&self, path: &Path) -> Result<Project> {
        let path_str = path.to_string_lossy().into_owned();
        if let Some(existing) = self.projects.get_by_path(&path_str).await? {
            return Ok(existing);
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_str.clone());
        let project = Project::new(path_str, name, now_epoch_secs());
        self.projects.upsert(&project).await?;
        Ok(project)
    }

    /// Re-scan `root`, updating file records and symbol trees to match its
    /// current contents. `root` must be absolute and readable.
    pub async fn analyze(&self, project_id: ProjectId, root: &Path) -> Result<AnalysisReport> {
        let walked = walker::walk_project(root)?;
        if walked.files.is_empty() {
            return Ok(AnalysisReport::default());
        }
        let detected = language::detect_languages(&walked.extension_counts, &walked.root_markers);

        let mut project = self.projects.get(project_id).await?;
        project.primary_language = detected.primary.clone();
        project.languages = detected.languages.clone();
        project.updated_at = now_epoch_secs();
        self.projects.upsert(&project).await?;

        let existing = self.files.list_by_project(project_id).await?;
        let mut existing_by_path: HashMap<String, FileRecord> =
            existing.into_iter().map(|f| (f.path.clone(), f)).collect();

        let registry = LspRegistry::new(root.to_string_lossy().into_owned());
        let mut report = AnalysisReport::default();

        let mut readable = Vec::with_capacity(walked.files.len());
        for file in &walked.files {
            match tokio::fs::read_to_string(&file.absolute_path).await {
                Ok(content) => readable.push((file, content)),
                Err(err) => {
                    warn!(path = %file.absolute_path.display(), %err, "failed to read file, skipping");
                    report.errors += 1;
                }
            }
        }
        let contents: Vec<String> = readable.iter().map(|(_, content)| content.clone()).collect();
        let hashes = hasher::hash_many(&contents);

        for ((file, content), hash) in readable.into_iter().zip(hashes) {
            let previous = existing_by_path.remove(&file.relative_path);

            let classification = match &previous {
                None => Classification::New,
                Some(record) if record.has_changed(&hash) => Classification::Changed,
                Some(_) => Classification::Unchanged,
            };

            match classification {
                Classification::New => report.new += 1,
                Classification::Changed => report.changed += 1,
                Classification::Unchanged => {
                    report.unchanged += 1;
                    continue;
                }
            }

            let language_name = file.extension.as_deref().and_then(language::language_for_extension);
            let now = now_epoch_secs();
            let mut record = FileRecord::new(
                project_id,
                file.relative_path.clone(),
                content.len() as u64,
                hash,
                language_name.map(str::to_owned),
                now,
            );
            record.is_entrypoint = language::is_entrypoint(&file.relative_path);

            let symbols = match language_name {
                Some(language_name) => {
                    extract_symbols(&registry, record.id, &file.absolute_path, language_name, &content).await
                }
                None => Vec::new(),
            };

            self.symbols.replace_for_file(record.id, &symbols).await?;
            self.files.upsert(&record).await?;
            report.files_analyzed += 1;
            report.symbols_found += symbols.len();
        }

        for (_, stale) in existing_by_path {
            self.symbols.delete_for_file(stale.id).await?;
            self.files.delete(stale.id).await?;
            report.deleted += 1;
        }

        registry.shutdown_all().await;
        info!(
            project = %project_id,
            new = report.new,
            changed = report.changed,
            deleted = report.deleted,
            "analysis complete"
        );
        Ok(report)
    }

    /// Hierarchical symbol tree for the file at `project_relative_path`
    /// within `project_id`; empty if the file is not indexed.
    pub async fn file_outline(&self, project_id: ProjectId, project_relative_path: &str) -> Result<Vec<Symbol>> {
        let files = self.files.list_by_project(project_id).await?;
        let Some(file) = files.into_iter().find(|f| f.path == project_relative_path) else {
            return Ok(Vec::new());
        };
        self.symbols.list_by_file(file.id).await
    }

    /// Aggregate structural counts for a project.
    pub async fn project_structure(&self, project_id: ProjectId) -> Result<StructureSummary> {
        use codetrail_domain::entities::SymbolKind;

        let files = self.files.list_by_project(project_id).await?;
        let symbols = self.symbols.list_by_project(project_id).await?;
        let functions_and_methods = symbols
            .iter()
            .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Method))
            .count();
        let classes_and_interfaces = symbols
            .iter()
            .filter(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Interface))
            .count();
        Ok(StructureSummary {
            files: files.len(),
            symbols: symbols.len(),
            functions_and_methods,
            classes_and_interfaces,
        })
    }

    /// Every tracked file's path, hash, language, size and last-analyzed
    /// timestamp for a project.
    pub async fn hash_tree(&self, project_id: ProjectId) -> Result<Vec<FileHash>> {
        let files = self.files.list_by_project(project_id).await?;
        Ok(files
            .into_iter()
            .map(|f| FileHash {
                path: f.path,
                hash: f.content_hash,
                language: f.language,
                size: f.size_bytes,
                last_analyzed: f.last_analyzed_at,
            })
            .collect())
    }
}

async fn extract_symbols(
    registry: &LspRegistry,
    file_id: codetrail_domain::entities::FileId,
    absolute_path: &Path,
    language_name: &str,
    content: &str,
) -> Vec<Symbol> {
    let uri = format!("file://{}", absolute_path.display());
    let text = content.to_owned();
    let language_owned = language_name.to_owned();
    let outcome = registry
        .with_client(language_name, move |client| {
            Box::pin(async move { client.document_symbols(&uri, &language_owned, &text, file_id).await })
                as Pin<Box<dyn std::future::Future<Output = Result<Vec<Symbol>>> + Send>>
        })
        .await;

    match outcome {
        Some(Ok(symbols)) => symbols,
        Some(Err(err)) => {
            warn!(%err, "LSP extraction failed, falling back to regex extraction");
            fallback::extract_symbols(file_id, content, language_name)
        }
        None => fallback::extract_symbols(file_id, content, language_name),
    }
}
