pub mod embedding_service;
pub mod inference_service;
