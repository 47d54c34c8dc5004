//! Contact form and review board
//!
//! Storage lives in the feedback repository; this service adds validation
//! and the emails sent to the restaurant and to feedback authors.

use shared::models::{
    ContactSubmit, Feedback, FeedbackKind, FeedbackReceipt, ReviewBoard, ReviewSubmit,
};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::{CustomerPrincipal, StaffPrincipal};
use crate::db::repository::RepoError;
use crate::db::repository::feedback::{self, NewFeedback};
use crate::services::notifier::{Notification, SharedNotifier, deliver};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NOTE_LEN, normalize_email, validate_email, validate_name,
    validate_rating, validate_required_text,
};

#[derive(Clone)]
pub struct FeedbackService {
    pool: SqlitePool,
    notifier: SharedNotifier,
    restaurant_name: String,
    staff_email: Option<String>,
}

impl FeedbackService {
    pub fn new(
        pool: SqlitePool,
        notifier: SharedNotifier,
        restaurant_name: impl Into<String>,
        staff_email: Option<String>,
    ) -> Self {
        Self {
            pool,
            notifier,
            restaurant_name: restaurant_name.into(),
            staff_email,
        }
    }

    /// Store a contact-form message (hidden) and forward it to the restaurant
    pub async fn submit_contact(&self, payload: ContactSubmit) -> Result<FeedbackReceipt, AppError> {
        validate_name(&payload.name, "name")?;
        validate_email(payload.email.trim())?;
        validate_required_text(&payload.message, "message", MAX_MESSAGE_LEN)?;

        let entry = feedback::create(
            &self.pool,
            NewFeedback {
                customer_id: None,
                name: payload.name.trim().to_string(),
                email: normalize_email(&payload.email),
                kind: payload.kind,
                message: payload.message.trim().to_string(),
                rating: None,
                is_visible: false,
            },
        )
        .await?;
        tracing::info!(feedback_id = entry.id, kind = entry.kind.as_str(), "Contact message stored");

        let mut warnings = Vec::new();
        match &self.staff_email {
            Some(to) => {
                let notification = Notification::email(
                    to.clone(),
                    format!("New {} from {}", entry.kind.as_str(), entry.name),
                    format!(
                        "From: {} <{}>\nKind: {}\n\n{}\n",
                        entry.name,
                        entry.email,
                        entry.kind.as_str(),
                        entry.message
                    ),
                );
                warnings.extend(deliver(self.notifier.as_ref(), &notification).await);
            }
            None => tracing::debug!("STAFF_NOTIFY_EMAIL not set, contact message not forwarded"),
        }

        Ok(FeedbackReceipt {
            feedback: entry,
            warnings,
        })
    }

    /// Publish a customer review
    pub async fn submit_review(
        &self,
        customer: &CustomerPrincipal,
        payload: ReviewSubmit,
    ) -> Result<Feedback, AppError> {
        validate_rating(payload.rating)?;
        validate_required_text(&payload.message, "message", MAX_MESSAGE_LEN)?;

        let entry = feedback::create(
            &self.pool,
            NewFeedback {
                customer_id: Some(customer.id),
                name: customer.name.clone(),
                email: customer.email.clone(),
                kind: FeedbackKind::Comment,
                message: payload.message.trim().to_string(),
                rating: Some(payload.rating),
                is_visible: true,
            },
        )
        .await?;
        tracing::info!(feedback_id = entry.id, customer_id = customer.id, rating = payload.rating, "Review posted");
        Ok(entry)
    }

    /// Visible reviews with their rating distribution
    pub async fn review_board(&self) -> Result<ReviewBoard, AppError> {
        let reviews = feedback::find_visible_reviews(&self.pool).await?;
        let average_rating = feedback::average_visible_rating(&self.pool)
            .await?
            .map(|avg| (avg * 10.0).round() / 10.0);
        let rating_counts = feedback::rating_counts(&self.pool).await?;
        Ok(ReviewBoard {
            reviews,
            average_rating,
            rating_counts,
        })
    }

    /// Record a staff reply and email it to the author
    pub async fn reply(
        &self,
        staff: &StaffPrincipal,
        id: i64,
        reply: &str,
    ) -> Result<FeedbackReceipt, AppError> {
        validate_required_text(reply, "reply", MAX_NOTE_LEN)?;

        let entry = feedback::reply(&self.pool, id, reply.trim(), staff.id)
            .await
            .map_err(not_found)?;
        tracing::info!(feedback_id = id, staff_id = staff.id, "Feedback replied");

        let notification = Notification::email(
            entry.email.clone(),
            format!("{} replied to your message", self.restaurant_name),
            format!(
                "Hello {},\n\nYou wrote:\n> {}\n\nOur reply:\n{}\n\n{}\n",
                entry.name, entry.message, reply.trim(), self.restaurant_name
            ),
        );
        let warnings = deliver(self.notifier.as_ref(), &notification)
            .await
            .into_iter()
            .collect();

        Ok(FeedbackReceipt {
            feedback: entry,
            warnings,
        })
    }

    pub async fn set_visibility(&self, id: i64, is_visible: bool) -> Result<Feedback, AppError> {
        feedback::set_visibility(&self.pool, id, is_visible)
            .await
            .map_err(not_found)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        feedback::delete(&self.pool, id).await.map_err(not_found)
    }
}

fn not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::FeedbackNotFound, msg),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{customer, staff};
    use crate::services::notifier::LogNotifier;
    use shared::models::CustomerRegister;
    use std::sync::Arc;

    struct Board {
        outbox: Arc<LogNotifier>,
        service: FeedbackService,
        customer: CustomerPrincipal,
        staff: StaffPrincipal,
    }

    async fn setup() -> Board {
        let db = DbService::open_in_memory().await.unwrap();
        let outbox = Arc::new(LogNotifier::new());
        let service = FeedbackService::new(
            db.pool.clone(),
            outbox.clone(),
            "Test Bistro",
            Some("owner@example.com".into()),
        );
        let ada = customer::create(
            &db.pool,
            &CustomerRegister {
                email: "ada@example.com".into(),
                name: "Ada".into(),
                phone: None,
            },
        )
        .await
        .unwrap();
        let chef = staff::create(&db.pool, "chef@example.com", "Chef", "x")
            .await
            .unwrap();
        Board {
            outbox,
            service,
            customer: CustomerPrincipal {
                id: ada.id,
                name: ada.name,
                email: ada.email,
            },
            staff: StaffPrincipal {
                id: chef.id,
                name: chef.name,
                email: chef.email,
            },
        }
    }

    #[tokio::test]
    async fn test_contact_is_hidden_and_forwarded() {
        let Board {
            outbox, service, ..
        } = setup().await;
        let receipt = service
            .submit_contact(ContactSubmit {
                name: "Grace".into(),
                email: "Grace@Example.com".into(),
                kind: FeedbackKind::Complaint,
                message: "Soup was cold".into(),
            })
            .await
            .unwrap();

        assert!(!receipt.feedback.is_visible);
        assert_eq!(receipt.feedback.email, "grace@example.com");
        assert!(receipt.warnings.is_empty());
        assert_eq!(outbox.sent()[0].recipient(), "owner@example.com");

        let board = service.review_board().await.unwrap();
        assert!(board.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_review_rating_bounds() {
        let board = setup().await;
        let err = board
            .service
            .submit_review(
                &board.customer,
                ReviewSubmit {
                    message: "Great".into(),
                    rating: 6,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RatingOutOfRange);

        for rating in [5, 4] {
            board
                .service
                .submit_review(
                    &board.customer,
                    ReviewSubmit {
                        message: "Great".into(),
                        rating,
                    },
                )
                .await
                .unwrap();
        }
        let reviews = board.service.review_board().await.unwrap();
        assert_eq!(reviews.reviews.len(), 2);
        assert_eq!(reviews.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_reply_notifies_author() {
        let Board {
            outbox,
            service,
            customer,
            staff,
        } = setup().await;
        let review = service
            .submit_review(
                &customer,
                ReviewSubmit {
                    message: "Lovely".into(),
                    rating: 5,
                },
            )
            .await
            .unwrap();
        let receipt = service.reply(&staff, review.id, "Thank you!").await.unwrap();
        assert_eq!(receipt.feedback.reply.as_deref(), Some("Thank you!"));
        assert_eq!(receipt.feedback.replied_by, Some(staff.id));
        assert_eq!(outbox.sent().last().unwrap().recipient(), "ada@example.com");

        let err = service.reply(&staff, 999, "Hello").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedbackNotFound);
    }
}
