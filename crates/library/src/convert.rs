use crate::document::DocumentRecord;
use crate::error::{ErrorKind, Result};
use crate::reading::ReadingState;
use crate::view::{CoverView, UNTITLED, ViewRecord};
use exn::ResultExt;
use folio_cache::{Materialized, Materializer};
use folio_publication::Contributor;
use std::sync::Arc;
use tracing::instrument;

/// Builds [`ViewRecord`]s from document records.
pub struct ViewConverter {
    materializer: Arc<Materializer>,
    reading: Option<Arc<dyn ReadingState>>,
}

impl ViewConverter {
    /// A converter with no reading state; every view's last reading location
    /// will be empty.
    pub fn new(materializer: Arc<Materializer>) -> Self {
        Self { materializer, reading: None }
    }

    pub fn with_reading_state(mut self, reading: Arc<dyn ReadingState>) -> Self {
        self.reading = Some(reading);
        self
    }

    pub fn materializer(&self) -> &Arc<Materializer> {
        &self.materializer
    }

    /// Materializes the document's publication and flattens it, together with
    /// the record itself, into a view.
    ///
    /// A missing reading position is not an error. Anything that stops the
    /// publication from being materialized is.
    #[instrument(skip_all, fields(identifier = %document.identifier))]
    pub async fn convert(&self, document: &DocumentRecord) -> Result<ViewRecord> {
        let Materialized { publication, resolution } =
            self.materializer.materialize(&document.identifier).await.or_raise(|| ErrorKind::Materialize)?;
        tracing::debug!(%resolution, "Converting publication to view");

        let r2_publication_json = publication.to_manifest_value().or_raise(|| ErrorKind::Serialize)?;
        let metadata = &publication.metadata;
        let title = match document.title.as_str() {
            "" => UNTITLED.to_string(),
            title => title.to_string(),
        };
        let cover = document.cover_file.as_ref().filter(|file| !file.url.is_empty()).map(|file| CoverView::new(&file.url));
        let last_reading_location = self.reading.as_ref().and_then(|reading| reading.last_reading_location(&document.identifier));

        Ok(ViewRecord {
            identifier: document.identifier.clone(),
            title,
            authors: names(&metadata.authors),
            description: metadata.description.clone(),
            languages: metadata.languages.clone(),
            publishers: names(&metadata.publishers),
            work_identifier: metadata.identifier.clone(),
            published_at: metadata.published_at(),
            tags: document.tags.clone(),
            cover,
            custom_cover: document.custom_cover.clone(),
            lcp: document.lcp.clone(),
            lcp_rights_copies: document.lcp_rights_copies,
            rdf_type: metadata.rdf_type.clone(),
            duration: metadata.duration,
            nb_of_tracks: metadata.track_count(),
            r2_publication_json,
            last_reading_location,
        })
    }
}

fn names(contributors: &[Contributor]) -> Vec<String> {
    contributors.iter().map(|contributor| contributor.display_name().to_string()).collect()
}
