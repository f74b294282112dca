//! Culler engine: remote photo library access, page cache, viewed ledger and review pipeline.
mod api;
mod approve;
mod cache;
mod culler;
mod error;
mod fetch;
mod persist;
mod select;
mod viewed;

pub use api::{
    ApiError, ApiFailure, ApiSettings, Credential, PhotosApi, ReqwestPhotosClient, SearchPage,
    DEFAULT_API_BASE_URL,
};
pub use approve::{ApprovalReceipt, ApprovalSink};
pub use cache::{Clock, PageCache};
pub use culler::{Culler, CullerConfig, PickResult, SkipReceipt};
pub use error::{CullError, ErrorPayload};
pub use fetch::{FetchedPage, PageFetcher};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use select::{Selector, SelectorSettings};
pub use viewed::{ViewedSet, DEFAULT_VIEWED_FILE};
