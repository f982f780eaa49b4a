use std::sync::Arc;
use std::time::Duration;

use crate::cv::extraction::CvExtractor;
use crate::cv::storage::CvStorage;
use crate::interview::engine::InterviewEngine;
use crate::interview::store::InterviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub cv_storage: Arc<dyn CvStorage>,
    pub cv_extractor: Arc<dyn CvExtractor>,
    pub engine: Arc<InterviewEngine>,
    /// Lifetime of the presigned CV URL returned with interview details.
    pub cv_url_ttl: Duration,
}
