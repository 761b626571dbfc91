// Comparison: outbound payload, scoring client, request lifecycle, and result views.
// The scoring service is the only network collaborator; everything else is local.

pub mod handlers;
pub mod orchestrator;
pub mod request;
pub mod result;
pub mod scoring_client;
