// Bulk analysis engine: admission → encoding → request building → remote analysis →
// error classification → job tracking → ranking → export.
// All remote calls go through llm_client; nothing here talks to Gemini directly.

pub mod classifier;
pub mod encoder;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod ranker;
pub mod report;
pub mod request_builder;
pub mod schema;
pub mod session;
pub mod tracker;
pub mod validator;
