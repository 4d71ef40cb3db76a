//! Inference gateway for hosted text-generation models.
//!
//! - [`services::inference_service::InferenceGateway`]: one POST per prompt,
//!   response normalization and degraded-status mapping
//! - [`model_selector::ModelSelector`]: probe-once, pin-forever model choice
//! - [`services::embedding_service::EmbeddingService`]: feature-extraction client
//!   used by the retrieval store
//! - [`telemetry`]: tracing layer shared by the workspace binary

pub mod config;
pub mod error_handler;
pub mod generation;
pub mod model_selector;
pub mod services;
pub mod telemetry;
