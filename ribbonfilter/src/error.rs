// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for ribbon filter operations

use std::fmt;

/// ErrorKind is all kinds of Error of ribbonfilter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A key was added to a filter that has already been built.
    AlreadyBuilt,
    /// Peeling could not resolve every staged key; the staged keys were discarded.
    ConstructionFailed,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::AlreadyBuilt => "AlreadyBuilt",
            ErrorKind::ConstructionFailed => "ConstructionFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into_static())
    }
}

/// Error is the error struct returned by all ribbonfilter functions.
///
/// # Examples
///
/// ```
/// # use ribbonfilter::error::Error;
/// # use ribbonfilter::error::ErrorKind;
/// let err = Error::new(ErrorKind::ConstructionFailed, "unpeelable").with_context("items", 100);
/// assert_eq!(err.kind(), ErrorKind::ConstructionFailed);
/// assert_eq!(err.message(), "unpeelable");
/// assert_eq!(err.context("items"), Some("100"));
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the first context value recorded under `key`.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Convenient constructors used within ribbonfilter crate.
impl Error {
    pub(crate) fn already_built() -> Self {
        Self::new(
            ErrorKind::AlreadyBuilt,
            "cannot add keys after the filter has been built",
        )
    }

    pub(crate) fn construction_failed(
        items: usize,
        distinct: usize,
        peeled: usize,
        slots: usize,
    ) -> Self {
        Self::new(
            ErrorKind::ConstructionFailed,
            format!("peeled {peeled} of {distinct} distinct keys; staged keys were discarded"),
        )
        .with_context("items", items)
        .with_context("distinct", distinct)
        .with_context("peeled", peeled)
        .with_context("slots", slots)
    }

    pub(crate) fn slot_out_of_range(index: usize, slots: usize) -> Self {
        Self::new(
            ErrorKind::ConstructionFailed,
            format!("hasher produced slot {index} outside of {slots} slots"),
        )
        .with_context("reason", "index out of range")
        .with_context("slots", slots)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in &self.context {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            let pairs = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, ", context: {{ {pairs} }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_already_built_format() {
        let err = Error::already_built();
        assert_eq!(err.kind(), ErrorKind::AlreadyBuilt);
        assert_snapshot!(err, @"AlreadyBuilt => cannot add keys after the filter has been built");
    }

    #[test]
    fn test_construction_failed_format() {
        let err = Error::construction_failed(100, 90, 12, 15);
        assert_eq!(err.context("items"), Some("100"));
        assert_eq!(err.context("distinct"), Some("90"));
        assert_eq!(err.context("peeled"), Some("12"));
        assert_eq!(err.context("missing"), None);
        assert_snapshot!(err, @"ConstructionFailed, context: { items: 100, distinct: 90, peeled: 12, slots: 15 } => peeled 12 of 90 distinct keys; staged keys were discarded");
    }

    #[test]
    fn test_slot_out_of_range_format() {
        let err = Error::slot_out_of_range(99, 3);
        assert_eq!(err.kind(), ErrorKind::ConstructionFailed);
        assert_snapshot!(err, @"ConstructionFailed, context: { reason: index out of range, slots: 3 } => hasher produced slot 99 outside of 3 slots");
    }

    #[test]
    fn test_debug_lists_context() {
        let err = Error::new(ErrorKind::AlreadyBuilt, "late add").with_context("key", "kiwi");
        assert_eq!(
            format!("{err:?}"),
            "AlreadyBuilt => late add\n\nContext:\n   key: kiwi\n"
        );
    }
}
