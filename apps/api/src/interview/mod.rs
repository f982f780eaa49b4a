pub mod assessment;
pub mod collaborators;
pub mod engine;
pub mod handlers;
pub mod locks;
pub mod onboarding;
pub mod phase;
pub mod prompt_builder;
pub mod prompts;
pub mod store;
