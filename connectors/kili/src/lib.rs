//! Kili Connector
//!
//! Typed access to the Kili labeling platform's GraphQL API. Every public
//! operation builds its document through `kili-graphql`, sends it over a
//! [`Transport`], and returns the unwrapped payload.
//!
//! ## Operations
//!
//! ### Assets (mutations)
//! - `createAssets`, `deleteAssetsByExternalId`
//! - `appendToDataset`, `appendManyToDataset`
//! - `updateAsset`, `updatePropertiesInAsset`
//! - `deleteFromDataset`, `deleteManyFromDataset`, `forceUpdateStatus`
//!
//! ### Projects (queries)
//! - `getProjects`, `getProject`
//!
//! ### Users (queries)
//! - `users`, `countUsers`

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod assets;
mod capability;
mod client;
mod config;
mod error;
mod fields;
mod projects;
mod types;
mod users;

pub use capability::{ApiVersion, CAPABILITIES, Capability, ensure_supported, versions_for};
pub use client::KiliClient;
pub use config::KiliConfig;
pub use error::{KiliError, KiliResult};
pub use fields::{DEFAULT_USER_FIELDS, FieldSelection};
pub use kili_graphql::{OperationError, Transport};
pub use types::{
    AppendManyToDataset, AppendToDataset, AssetPropertiesUpdate, AssetStatus, Page, UpdateAsset,
    UserFilter,
};
