//! Entry point tying the pool, the transport and the pipelines together.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::pipeline::{Hashtag, LabelLookup, Place, Search};
use crate::session::SessionPool;
use crate::transport::Transport;

/// Cheap to clone; clones share the pool, the transport and the lookup.
#[derive(Clone)]
pub struct Client {
	inner: Arc<ClientInner>,
}

struct ClientInner {
	dispatcher: Dispatcher,
	config: ClientConfig,
	lookup: Option<Arc<dyn LabelLookup>>,
}

impl std::fmt::Debug for Client {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Client")
			.field("dispatcher", &self.inner.dispatcher)
			.field("config", &self.inner.config)
			.field("lookup", &self.inner.lookup.is_some())
			.finish()
	}
}

impl Client {
	pub fn new(pool: SessionPool, transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
		Self::builder(pool, transport).config(config).build()
	}

	pub fn builder(pool: SessionPool, transport: Arc<dyn Transport>) -> ClientBuilder {
		ClientBuilder {
			pool,
			transport,
			config: ClientConfig::default(),
			lookup: None,
		}
	}

	pub fn hashtag(&self, label: impl Into<String>) -> Hashtag {
		Hashtag::new(self.clone(), label)
	}

	pub fn place(&self, label: impl Into<String>) -> Place {
		Place::new(self.clone(), label)
	}

	pub fn search(&self, keyword: impl Into<String>) -> Search {
		Search::new(self.clone(), keyword)
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.inner.dispatcher
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	pub fn pool(&self) -> &SessionPool {
		self.inner.dispatcher.pool()
	}

	pub(crate) fn lookup(&self) -> Option<&dyn LabelLookup> {
		self.inner.lookup.as_deref()
	}
}

pub struct ClientBuilder {
	pool: SessionPool,
	transport: Arc<dyn Transport>,
	config: ClientConfig,
	lookup: Option<Arc<dyn LabelLookup>>,
}

impl ClientBuilder {
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	/// Consulted before the detail endpoint when resolving labels.
	pub fn label_lookup(mut self, lookup: impl LabelLookup + 'static) -> Self {
		self.lookup = Some(Arc::new(lookup));
		self
	}

	pub fn build(self) -> Client {
		Client {
			inner: Arc::new(ClientInner {
				dispatcher: Dispatcher::new(Arc::new(self.pool), self.transport),
				config: self.config,
				lookup: self.lookup,
			}),
		}
	}
}
