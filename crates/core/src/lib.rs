// feedwalk: session-pooled resolution and pagination pipelines
//
// Sessions (cookies, headers, query parameters) are produced out-of-band by a
// browser. This crate only selects one per operation, assembles requests
// from it and walks the listing endpoints lazily.

pub mod client;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod session;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE, Endpoints, ProbeConfig};
pub use cursor::{CursorPolicy, PageIndexed, PageSummary, PaginationState, ServerDriven, SinglePage};
pub use dispatch::{Dispatcher, Headers, QueryParams, RequestOptions, RequestOutcome};
pub use error::{Error, ErrorKind, ResolutionError, Result};
pub use feedwalk_protocol::Cursor;
pub use pipeline::{EntityInfo, Hashtag, LabelLookup, LabelTable, Pipeline, Place, RecordStream, Search, SearchInfo};
pub use record::{RecordFactory, Video, VideoFactory};
pub use session::{SelectionPolicy, Session, SessionPool};
pub use transport::{FakeTransport, HttpTransport, HttpTransportOptions, Transport};
