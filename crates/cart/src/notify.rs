//! User-facing notifications for rejected cart operations.
//!
//! The store reports failures through a [`Notifier`] instead of returning
//! errors, so presentation (toast, status line, log) stays outside the cart.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Messages shown to the user when an operation is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Requested amount exceeds available stock.
    OutOfStock,
    /// Adding a product failed for a reason other than stock.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product's amount failed for a reason other than stock.
    UpdateFailed,
}

impl Notice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity out of stock",
            Self::AddFailed => "Error adding product",
            Self::RemoveFailed => "Error removing product",
            Self::UpdateFailed => "Error changing product quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for transient, non-blocking user messages.
pub trait Notifier {
    /// Surface an error message. Fire-and-forget.
    fn error(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Logs notifications and records them as Sentry breadcrumbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notice = %message, "Cart notification");

        sentry::add_breadcrumb(sentry::Breadcrumb {
            category: Some("cart".to_string()),
            message: Some(message.to_string()),
            level: sentry::Level::Warning,
            ..Default::default()
        });
    }
}

/// Buffers notifications for a UI to drain.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all buffered messages.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
