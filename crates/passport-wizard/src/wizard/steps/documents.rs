use super::StepRejection;
use crate::wizard::domain::{CandidateFile, DocumentKind};
use crate::wizard::form::DocumentSet;

pub struct DocumentUploadStep<'a> {
    documents: &'a mut DocumentSet,
}

impl<'a> DocumentUploadStep<'a> {
    pub fn new(documents: &'a mut DocumentSet) -> Self {
        Self { documents }
    }

    /// Fills the slot when the candidate declares `application/pdf`. Anything else is
    /// rejected with the offending type and the slot keeps its previous file.
    pub fn attach(
        &mut self,
        kind: DocumentKind,
        candidate: CandidateFile,
    ) -> Result<(), StepRejection> {
        if !candidate.is_pdf() {
            return Err(StepRejection::UnsupportedFileType {
                kind,
                content_type: candidate.content_type,
            });
        }

        self.documents.set(kind, Some(candidate));
        Ok(())
    }

    pub fn detach(&mut self, kind: DocumentKind) {
        self.documents.set(kind, None);
    }

    pub fn proceed(&self) -> Result<(), StepRejection> {
        let missing = self.documents.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StepRejection::MissingDocuments { missing })
        }
    }
}
