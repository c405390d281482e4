// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration errors reported by [`DataSource`](crate::DataSource).

use alloc::string::String;

use understory_flow_layout::IndexPath;

/// A misconfigured integration between rows, data source, and host.
///
/// These are programmer errors: the host asked for something the rows were
/// never set up to provide. Hosts are expected to treat them as fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    /// The row does not declare how to build its view.
    #[error("row `{row_id}` does not declare a cell template")]
    MissingTemplate {
        /// Id of the offending row.
        row_id: String,
    },
    /// No supplementary row was registered for the requested kind and path.
    #[error("no `{kind}` supplementary row at {index_path}")]
    MissingSupplementaryRow {
        /// Requested element kind.
        kind: String,
        /// Requested index path.
        index_path: IndexPath,
    },
    /// The index path does not name a row.
    #[error("no row at {index_path}")]
    IndexOutOfRange {
        /// Requested index path.
        index_path: IndexPath,
    },
}
