use serde::{Deserialize, Serialize};

use crate::domain::entities::{ExplicitContentAnnotation, ExplicitFrame, SafeSearchAnnotation};
use crate::domain::value_objects::Likelihood;

pub const SAFE_SEARCH_FEATURE: &str = "SAFE_SEARCH_DETECTION";
pub const EXPLICIT_CONTENT_FEATURE: &str = "EXPLICIT_CONTENT_DETECTION";

/// `images:annotate` request body
#[derive(Debug, Serialize)]
pub struct BatchAnnotateImagesRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageInput,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct ImageInput {
    pub source: ImageSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub image_uri: String,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
}

/// `images:annotate` response body
#[derive(Debug, Deserialize)]
pub struct BatchAnnotateImagesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub safe_search_annotation: Option<SafeSearchResult>,
    pub error: Option<ApiStatus>,
}

/// Likelihood per safe-search category; absent categories are `Unknown`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SafeSearchResult {
    pub adult: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
    pub medical: Likelihood,
    pub spoof: Likelihood,
}

/// Error status embedded in Google API payloads
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiStatus {
    pub code: i32,
    pub message: String,
}

/// `videos:annotate` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoRequest {
    pub input_uri: String,
    pub features: Vec<String>,
}

/// Long-running operation returned by `videos:annotate`
#[derive(Debug, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<ApiStatus>,
    pub response: Option<AnnotateVideoResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoResponse {
    #[serde(default)]
    pub annotation_results: Vec<VideoAnnotationResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    pub explicit_annotation: Option<ExplicitAnnotation>,
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExplicitAnnotation {
    #[serde(default)]
    pub frames: Vec<ExplicitFrameResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitFrameResult {
    pub time_offset: Option<String>,
    #[serde(default)]
    pub pornography_likelihood: Likelihood,
}

impl BatchAnnotateImagesRequest {
    pub fn safe_search(image_uri: String) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageInput { source: ImageSource { image_uri } },
                features: vec![Feature { feature_type: SAFE_SEARCH_FEATURE.to_string() }],
            }],
        }
    }
}

impl AnnotateVideoRequest {
    pub fn explicit_content(input_uri: String) -> Self {
        Self { input_uri, features: vec![EXPLICIT_CONTENT_FEATURE.to_string()] }
    }
}

impl From<SafeSearchResult> for SafeSearchAnnotation {
    fn from(result: SafeSearchResult) -> Self {
        Self {
            adult: result.adult,
            violence: result.violence,
            racy: result.racy,
            medical: result.medical,
            spoof: result.spoof,
        }
    }
}

impl AnnotateVideoResponse {
    /// Collect frames from every annotation result into one verdict
    pub fn into_annotation(self) -> ExplicitContentAnnotation {
        let frames = self
            .annotation_results
            .into_iter()
            .filter_map(|result| result.explicit_annotation)
            .flat_map(|annotation| annotation.frames)
            .map(|frame| ExplicitFrame {
                time_offset: frame.time_offset,
                pornography_likelihood: frame.pornography_likelihood,
            })
            .collect();

        ExplicitContentAnnotation::new(frames)
    }
}
