use tracing::{info, warn};

use crate::error::AppResult;
use crate::session::FlashMessage;
use crate::store::ReviewStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    PermissionDenied,
}

impl DeleteOutcome {
    pub fn flash(self) -> FlashMessage {
        match self {
            DeleteOutcome::Deleted => FlashMessage::success("Review deleted."),
            DeleteOutcome::NotFound => FlashMessage::error("Review not found."),
            DeleteOutcome::PermissionDenied => {
                FlashMessage::error("You do not have permission to delete this review.")
            }
        }
    }
}

/// Deletes `review_id` only if `user_id` wrote it.
pub async fn delete_review(
    reviews: &dyn ReviewStore,
    review_id: i32,
    user_id: i32,
) -> AppResult<DeleteOutcome> {
    let Some(review) = reviews.find_review(review_id).await? else {
        return Ok(DeleteOutcome::NotFound);
    };

    if !review.is_owned_by(user_id) {
        warn!(review_id, user_id, owner = review.user_id, "review delete denied");
        return Ok(DeleteOutcome::PermissionDenied);
    }

    // The owner check is repeated in the DELETE itself
    if reviews.delete_owned_review(review_id, user_id).await? {
        info!(review_id, user_id, "review deleted");
        Ok(DeleteOutcome::Deleted)
    } else {
        Ok(DeleteOutcome::NotFound)
    }
}
