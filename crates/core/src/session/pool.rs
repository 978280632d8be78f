//! Fixed-size pool of authenticated sessions.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::handle::Session;
use super::storage::load_session_file;
use crate::error::{Error, Result};

/// How [`SessionPool::acquire`] picks a session when no index is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
	#[default]
	RoundRobin,
	Random,
}

/// Owns the session handles produced out-of-band by the browser side.
///
/// The pool never creates, refreshes or retires sessions after construction.
/// `acquire` is safe to call from concurrent traversals; the only shared
/// mutable state is the round-robin counter.
#[derive(Debug)]
pub struct SessionPool {
	sessions: Vec<Arc<Session>>,
	policy: SelectionPolicy,
	next: AtomicUsize,
}

impl SessionPool {
	/// Creates a pool; each session's index becomes its position.
	pub fn new(sessions: Vec<Session>, policy: SelectionPolicy) -> Self {
		let sessions = sessions
			.into_iter()
			.enumerate()
			.map(|(index, session)| Arc::new(session.with_index(index)))
			.collect();
		Self {
			sessions,
			policy,
			next: AtomicUsize::new(0),
		}
	}

	/// Creates a pool from session context files, in order.
	pub fn from_files<P: AsRef<Path>>(paths: &[P], policy: SelectionPolicy) -> Result<Self> {
		let sessions = paths.iter().map(|path| load_session_file(path.as_ref())).collect::<Result<Vec<_>>>()?;
		debug!(target = "feedwalk::session", count = sessions.len(), ?policy, "session pool loaded");
		Ok(Self::new(sessions, policy))
	}

	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	pub fn policy(&self) -> SelectionPolicy {
		self.policy
	}

	/// Returns the session at `index`, or one chosen by the pool's policy.
	///
	/// # Errors
	///
	/// [`Error::PoolIndex`] when `index` is out of range or the pool is empty.
	pub fn acquire(&self, index: Option<usize>) -> Result<Arc<Session>> {
		let size = self.sessions.len();
		let index = match index {
			Some(index) => index,
			None if size == 0 => 0,
			None => match self.policy {
				SelectionPolicy::RoundRobin => self.next.fetch_add(1, Ordering::Relaxed) % size,
				SelectionPolicy::Random => rand::thread_rng().gen_range(0..size),
			},
		};
		self.sessions.get(index).cloned().ok_or(Error::PoolIndex { index, size })
	}
}
