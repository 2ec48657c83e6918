pub mod classifier;
pub mod commands;
pub mod errors;
pub mod experience;
pub mod knowledge_base;
pub mod model_store;
pub mod models;
pub mod naive_bayes;
pub mod normalize;
pub mod pdf;
pub mod scoring;
pub mod service;
pub mod settings;
pub mod skills;
pub mod vectorizer;
