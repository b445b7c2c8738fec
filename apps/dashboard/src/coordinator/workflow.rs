use std::fmt;

use serde_json::Value;

use crate::api_client::{ApiError, Collaborator, Upload};

/// The dashboard's views. Changed only by explicit user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveView {
    #[default]
    Overview,
    Jobs,
    PostGenerator,
    ProfileAudit,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Overview,
        ActiveView::Jobs,
        ActiveView::PostGenerator,
        ActiveView::ProfileAudit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActiveView::Overview => "Overview",
            ActiveView::Jobs => "Job Matcher",
            ActiveView::PostGenerator => "Post Generator",
            ActiveView::ProfileAudit => "Profile Audit",
        }
    }

    /// Whether a user action starting `workflow` belongs to this view.
    pub fn owns(&self, workflow: Workflow) -> bool {
        workflow.owner() == *self
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-triggered asynchronous workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    ProfileUpload,
    ProfileAnalysis,
    PostGeneration,
    Publish,
    JobSearch,
}

impl Workflow {
    pub fn owner(&self) -> ActiveView {
        match self {
            Workflow::ProfileUpload => ActiveView::Overview,
            Workflow::ProfileAnalysis => ActiveView::ProfileAudit,
            Workflow::PostGeneration | Workflow::Publish => ActiveView::PostGenerator,
            Workflow::JobSearch => ActiveView::Jobs,
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workflow::ProfileUpload => "Profile upload",
            Workflow::ProfileAnalysis => "Profile analysis",
            Workflow::PostGeneration => "Post generation",
            Workflow::Publish => "Publishing",
            Workflow::JobSearch => "Job search",
        };
        f.write_str(name)
    }
}

/// Where an analysis payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// Resume or profile PDF.
    ProfilePdf(Upload),
    /// PDF exported from the LinkedIn profile page.
    LinkedInExport(Upload),
    /// Public profile URL, scraped server-side.
    ProfileUrl(String),
}

/// Payload-free tag of an [`AnalysisRequest`], carried on completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    ProfilePdf,
    LinkedInExport,
    ProfileUrl,
}

impl AnalysisSource {
    pub fn failure_message(&self) -> &'static str {
        match self {
            AnalysisSource::ProfilePdf => "Failed to analyze PDF.",
            AnalysisSource::LinkedInExport => "PDF Analysis Failed. Check Backend.",
            AnalysisSource::ProfileUrl => {
                "Scraping Failed. Make sure Backend Selenium is configured."
            }
        }
    }
}

impl AnalysisRequest {
    pub fn source(&self) -> AnalysisSource {
        match self {
            AnalysisRequest::ProfilePdf(_) => AnalysisSource::ProfilePdf,
            AnalysisRequest::LinkedInExport(_) => AnalysisSource::LinkedInExport,
            AnalysisRequest::ProfileUrl(_) => AnalysisSource::ProfileUrl,
        }
    }

    /// Empty uploads and blank URLs are no-ops, not errors.
    pub fn is_empty(&self) -> bool {
        match self {
            AnalysisRequest::ProfilePdf(upload) | AnalysisRequest::LinkedInExport(upload) => {
                upload.is_empty()
            }
            AnalysisRequest::ProfileUrl(url) => url.trim().is_empty(),
        }
    }

    pub async fn run(self, api: &dyn Collaborator) -> Result<Value, ApiError> {
        match self {
            AnalysisRequest::ProfilePdf(upload) => api.analyze_profile_pdf(upload).await,
            AnalysisRequest::LinkedInExport(upload) => api.analyze_linkedin(upload).await,
            AnalysisRequest::ProfileUrl(url) => api.scrape_url(url.trim()).await,
        }
    }
}
