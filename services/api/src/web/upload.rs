//! services/api/src/web/upload.rs
//!
//! Reads the body of a doubt submission. `multipart/form-data` may carry at most
//! one file, and only under the `image` field. A urlencoded body carries the text
//! alone.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::error;

use crate::error::WebError;

pub const IMAGE_FIELD: &str = "image";
pub const DOUBT_FIELD: &str = "doubt";

const SUBMIT_FAILED: &str = "Error submitting doubt";

/// A file part taken from the request body.
pub struct UploadedFile {
    pub original_name: String,
    pub data: Bytes,
}

/// The parsed doubt form.
#[derive(Default)]
pub struct DoubtSubmission {
    pub doubt_text: String,
    pub image: Option<UploadedFile>,
}

/// The urlencoded variant of the doubt form.
#[derive(Deserialize)]
struct DoubtForm {
    #[serde(default)]
    doubt: String,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for DoubtSubmission
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                error!("Failed to open multipart body: {}", e.body_text());
                WebError::Validation(e.body_text())
            })?;
            return Self::from_multipart(multipart).await;
        }

        let Form(form) = Form::<DoubtForm>::from_request(req, state)
            .await
            .map_err(|r| WebError::rejected_form(r, SUBMIT_FAILED))?;
        Ok(DoubtSubmission {
            doubt_text: form.doubt,
            image: None,
        })
    }
}

impl DoubtSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, WebError> {
        let mut submission = DoubtSubmission::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            error!("Failed to read multipart data: {:?}", e);
            WebError::Validation(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            match (name.as_str(), file_name) {
                (IMAGE_FIELD, Some(original_name)) => {
                    let data = field.bytes().await.map_err(|e| {
                        error!("Failed to read file bytes: {:?}", e);
                        WebError::Validation(format!("Failed to read file bytes: {}", e))
                    })?;
                    // Browsers send an empty part when no file was chosen.
                    if original_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    if submission.image.is_some() {
                        return Err(WebError::Validation(
                            "Only one image may be attached".to_string(),
                        ));
                    }
                    submission.image = Some(UploadedFile { original_name, data });
                }
                (_, Some(_)) => {
                    return Err(WebError::Validation(format!(
                        "Unexpected file field: {}",
                        name
                    )));
                }
                (DOUBT_FIELD, None) => {
                    submission.doubt_text = field.text().await.map_err(|e| {
                        WebError::Validation(format!("Failed to read doubt text: {}", e))
                    })?;
                }
                // Unknown text fields are ignored, like any other form post.
                _ => {}
            }
        }

        Ok(submission)
    }
}
