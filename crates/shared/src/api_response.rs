//! # 成功レスポンス
//!
//! 通知エンドポイントの成功レスポンス `{ "success": true }` を提供する。
//! リマインダー実行のみ送信件数 `sent` を含む。

use serde::{Deserialize, Serialize};

/// 成功レスポンス
///
/// ## 使用例
///
/// ```
/// use sitterpro_shared::SuccessResponse;
///
/// let response = SuccessResponse::with_sent(3);
/// assert_eq!(response.sent, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent:    Option<usize>,
}

impl SuccessResponse {
    /// `{ "success": true }`
    pub fn ok() -> Self {
        Self {
            success: true,
            sent:    None,
        }
    }

    /// `{ "success": true, "sent": n }`
    pub fn with_sent(sent: usize) -> Self {
        Self {
            success: true,
            sent:    Some(sent),
        }
    }
}
