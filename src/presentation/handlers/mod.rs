pub mod events;
pub mod objects;

use std::sync::Arc;

use crate::{
    application::use_cases::{
        ModerateImageUseCase, ModerateVideoUseCase, PlaceholderAssets, PlaceholderReplacer,
    },
    infrastructure::{
        classifiers::{VideoIntelligenceClient, VisionClient},
        config::AppConfig,
        storage::{FilesystemStorage, ObjectStorage, SignedUrlService},
        stream::StreamClient,
    },
    presentation::middleware::error::AppError,
};

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub image: Arc<ModerateImageUseCase>,
    pub video: Arc<ModerateVideoUseCase>,
    pub storage: Arc<dyn ObjectStorage>,
    pub signer: SignedUrlService,
    pub placeholders: PlaceholderAssets,
}

impl AppState {
    /// Wire the production collaborators from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn ObjectStorage> = Arc::new(FilesystemStorage::new(
            config.storage.bucket.clone(),
            config.storage.base_path(),
        ));

        let vision = VisionClient::new(config.vision.clone())
            .map_err(|e| AppError::classifier("safe-search", &e))?;
        let video_intelligence =
            VideoIntelligenceClient::new(config.video_intelligence.clone())
                .map_err(|e| AppError::classifier("explicit-content", &e))?;
        let stream = StreamClient::new(config.stream.clone())?;

        let placeholders = PlaceholderAssets::from_storage_config(&config.storage);
        let replacer = Arc::new(PlaceholderReplacer::new(
            storage.clone(),
            config.storage.temp_path(),
            config.storage.replace_strategy,
            placeholders.clone(),
        ));
        let signer = SignedUrlService::from_app_config(config);

        Ok(Self {
            image: Arc::new(ModerateImageUseCase::new(Arc::new(vision), replacer.clone())),
            video: Arc::new(ModerateVideoUseCase::new(
                Arc::new(video_intelligence),
                replacer,
                signer.clone(),
                Arc::new(stream),
            )),
            storage,
            signer,
            placeholders,
        })
    }
}
