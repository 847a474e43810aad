//! Absolute URL resolution for content objects

use crate::form::Content;
use crate::wizard::WizardRequest;

/// Resolves the canonical absolute URL of the content a wizard runs on
pub trait UrlResolver: Send + Sync {
    fn absolute_url(&self, content: &dyn Content, request: &WizardRequest) -> String;
}

/// Joins the request's application URL and content path
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUrl;

impl UrlResolver for RequestUrl {
    fn absolute_url(&self, _content: &dyn Content, request: &WizardRequest) -> String {
        join(&request.application_url, &request.content_path)
    }
}

/// Join two URL parts with exactly one slash between them
pub fn join(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, segment)
    }
}
