// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable view templates and the keys hosts register them under.

use alloc::borrow::Cow;
use alloc::string::String;
use core::any::{TypeId, type_name};
use core::fmt;

/// How a host builds the reusable view for a row.
///
/// A template is either a named resource the host knows how to load, or a
/// Rust view type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellTemplate {
    /// A named resource, for example a layout file bundled with the host.
    Resource(Cow<'static, str>),
    /// A view type.
    Type {
        /// Identity of the view type.
        id: TypeId,
        /// Type name, for diagnostics only.
        name: &'static str,
    },
}

impl CellTemplate {
    /// A template loaded from the resource called `name`.
    #[must_use]
    pub fn resource(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Resource(name.into())
    }

    /// A template built from the view type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The key hosts register and dequeue this template under.
    #[must_use]
    pub fn key(&self) -> TemplateKey {
        match self {
            Self::Resource(name) => TemplateKey::Resource(String::from(name.as_ref())),
            Self::Type { id, .. } => TemplateKey::Type(*id),
        }
    }

    /// Human readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Resource(name) => name.as_ref(),
            Self::Type { name, .. } => *name,
        }
    }
}

impl fmt::Display for CellTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(name) => write!(f, "resource `{name}`"),
            Self::Type { name, .. } => write!(f, "type `{name}`"),
        }
    }
}

/// Reuse identifier of a [`CellTemplate`].
///
/// Two templates with the same key produce interchangeable views.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// Key of [`CellTemplate::Resource`].
    Resource(String),
    /// Key of [`CellTemplate::Type`].
    Type(TypeId),
}
