//! Contact and review feedback

use serde::{Deserialize, Serialize};

/// Feedback kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum FeedbackKind {
    Request,
    Complaint,
    Comment,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Complaint => "complaint",
            Self::Comment => "comment",
        }
    }
}

/// Feedback entry
///
/// Contact-form entries start hidden; reviews are visible comments with a rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Feedback {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub kind: FeedbackKind,
    pub message: String,
    pub rating: Option<i32>,
    pub is_visible: bool,
    pub reply: Option<String>,
    pub replied_at: Option<i64>,
    pub replied_by: Option<i64>,
    pub created_at: i64,
}

/// Public contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmit {
    pub name: String,
    pub email: String,
    pub kind: FeedbackKind,
    pub message: String,
}

/// Customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmit {
    pub message: String,
    pub rating: i32,
}

/// Staff reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReply {
    pub reply: String,
}

/// Visibility toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackVisibility {
    pub is_visible: bool,
}

/// Staff listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackQuery {
    pub kind: Option<FeedbackKind>,
    pub replied: Option<bool>,
}

/// Outcome of storing feedback or a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub feedback: Feedback,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Board-wide counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FeedbackStats {
    pub total: i64,
    pub requests: i64,
    pub complaints: i64,
    pub comments: i64,
    pub replied: i64,
    pub pending: i64,
    pub average_rating: Option<f64>,
}

/// Count of visible reviews with a given star rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCount {
    pub rating: i32,
    pub count: i64,
}

/// Public review board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBoard {
    pub reviews: Vec<Feedback>,
    pub average_rating: Option<f64>,
    /// One entry per star, 1 through 5
    pub rating_counts: Vec<RatingCount>,
}
