//! # Notices
//!
//! Human-readable outcomes handed to the notification sink.
//!
//! Only display strings cross this boundary: the sink renders the message,
//! it never inspects error internals. `kind` is carried alongside so a UI can
//! pick a toast style without string matching.

use std::fmt;

use serde::Serialize;

use crate::error::CartOperation;

/// Category of a failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    ClearFailed,
}

impl NoticeKind {
    /// The fixed message for this category.
    pub const fn message(&self) -> &'static str {
        match self {
            NoticeKind::OutOfStock => "quantity requested out of stock",
            NoticeKind::AddFailed => "error adding product",
            NoticeKind::RemoveFailed => "error removing product",
            NoticeKind::UpdateFailed => "error changing product quantity",
            NoticeKind::ClearFailed => "error clearing cart",
        }
    }
}

/// A user-visible notification.
///
/// ## Serialization
/// ```json
/// { "kind": "out_of_stock", "message": "quantity requested out of stock" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    pub const fn new(kind: NoticeKind) -> Self {
        Notice {
            kind,
            message: kind.message(),
        }
    }

    /// Stock-exceeded notice, shared by add and update.
    pub const fn out_of_stock() -> Self {
        Notice::new(NoticeKind::OutOfStock)
    }

    /// Generic failure notice for an operation.
    pub const fn failed(operation: CartOperation) -> Self {
        Notice::new(match operation {
            CartOperation::Add => NoticeKind::AddFailed,
            CartOperation::Remove => NoticeKind::RemoveFailed,
            CartOperation::Update => NoticeKind::UpdateFailed,
            CartOperation::Clear => NoticeKind::ClearFailed,
        })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            Notice::out_of_stock().to_string(),
            "quantity requested out of stock"
        );
        assert_eq!(
            Notice::failed(CartOperation::Add).message,
            "error adding product"
        );
        assert_eq!(
            Notice::failed(CartOperation::Remove).message,
            "error removing product"
        );
        assert_eq!(
            Notice::failed(CartOperation::Update).message,
            "error changing product quantity"
        );
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_value(Notice::out_of_stock()).unwrap();
        assert_eq!(json["kind"], "out_of_stock");
        assert_eq!(json["message"], "quantity requested out of stock");
    }
}
