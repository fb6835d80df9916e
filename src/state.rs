//! Shared process state. The imitated stack layers each service as its own
//! `Extension` (a DB pool, a cookie key); this crate has enough independent
//! services that bundling them behind one `Arc<AppState>` is the natural
//! extension of the same pattern rather than seven separate layers.

use crate::config::Config;
use crate::jobstore::JobStore;
use crate::llm::LlmClient;
use crate::orchestrator::EnrichmentKickoff;
use crate::provider::google::PlacesProvider;
use crate::push::{PushChannel, TicketService};
use std::sync::Arc;

pub struct AppState {
	pub config: Arc<Config>,
	pub llm: Arc<LlmClient>,
	pub provider: Arc<PlacesProvider>,
	pub push: Arc<PushChannel>,
	pub tickets: Arc<TicketService>,
	pub job_store: Arc<dyn JobStore>,
	pub enrichment: Arc<dyn EnrichmentKickoff>,
}
