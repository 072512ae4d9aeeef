use serde::Serialize;
use tracing::{info, warn};

use crate::dto::review_dto::{RemoteReviewQuery, ReviewListQuery, StatusFilter};
use crate::error::{Error, Result};
use crate::models::answer_review::AnswerReview;
use crate::services::answer_classifier::{AnswerShapeClassifier, RenderedAnswer};
use crate::services::api_service::{ConsoleApi, Page};
use crate::services::review_submission::ReviewSubmission;

pub const PAGE_SIZES: [u32; 5] = [5, 10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        if PAGE_SIZES.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(Error::InvalidPageSize(value))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilters {
    pub review_status: StatusFilter,
    pub student_id: Option<i64>,
    pub assignment_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowState {
    Pending,
    Submitting,
    Reviewed,
}

#[derive(Debug, Clone)]
pub struct QueueRow {
    pub review: AnswerReview,
    pub rendered: RenderedAnswer,
    pub state: RowState,
}

impl QueueRow {
    fn new(review: AnswerReview) -> Self {
        let rendered = AnswerShapeClassifier::render(&review.answer);
        let state = if review.is_pending() {
            RowState::Pending
        } else {
            RowState::Reviewed
        };
        Self {
            review,
            rendered,
            state,
        }
    }

    /// Only pending rows with no submission outstanding offer the review action.
    pub fn actionable(&self) -> bool {
        self.state == RowState::Pending
    }
}

/// Filterable, paginated list of answer reviews for one screen.
///
/// Changing a filter or the page size always returns to page 1, and pages
/// outside `[1, total_pages]` are clamped rather than served empty.
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    filters: ReviewFilters,
    page: u32,
    page_size: PageSize,
    total: u64,
    total_pages: u32,
    rows: Vec<QueueRow>,
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self {
            filters: ReviewFilters::default(),
            page: 1,
            page_size: PageSize::default(),
            total: 0,
            total_pages: 0,
            rows: Vec::new(),
        }
    }

    /// Builds a queue straight from a gateway query; the requested page is
    /// clamped once the remote total is known.
    pub fn from_query(query: &ReviewListQuery) -> Result<Self> {
        let page_size = match query.limit {
            Some(limit) => PageSize::try_from(limit)?,
            None => PageSize::default(),
        };
        Ok(Self {
            filters: ReviewFilters {
                review_status: query.review_status,
                student_id: query.student_id,
                assignment_id: query.assignment_id,
            },
            page: query.page.unwrap_or(1).max(1),
            page_size,
            ..Self::new()
        })
    }

    pub fn filters(&self) -> &ReviewFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.page_size.get()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn rows(&self) -> &[QueueRow] {
        &self.rows
    }

    pub fn row(&self, review_id: i64) -> Option<&QueueRow> {
        self.rows.iter().find(|r| r.review.id == review_id)
    }

    pub fn set_review_status(&mut self, status: StatusFilter) {
        self.filters.review_status = status;
        self.page = 1;
    }

    pub fn set_student_id(&mut self, student_id: Option<i64>) {
        self.filters.student_id = student_id;
        self.page = 1;
    }

    pub fn set_assignment_id(&mut self, assignment_id: Option<i64>) {
        self.filters.assignment_id = assignment_id;
        self.page = 1;
    }

    pub fn set_limit(&mut self, limit: u32) -> Result<()> {
        self.page_size = PageSize::try_from(limit)?;
        self.page = 1;
        Ok(())
    }

    /// Clamps a typed-in page number into range and returns the page kept.
    pub fn set_page(&mut self, page: u32) -> u32 {
        self.page = clamp_page(page, self.total_pages);
        self.page
    }

    fn remote_query(&self, page: u32) -> RemoteReviewQuery {
        RemoteReviewQuery {
            review_status: self.filters.review_status.as_status(),
            student_id: self.filters.student_id,
            assignment_id: self.filters.assignment_id,
            page,
            limit: self.page_size.get(),
        }
    }

    /// Loads the current page. When the remote total shrank below the current
    /// page, the last page is fetched instead. On failure nothing changes.
    pub async fn refresh(&mut self, api: &dyn ConsoleApi) -> Result<()> {
        let mut page = self.page;
        let mut result = api.list_reviews(self.remote_query(page)).await?;

        if result.total_pages > 0 && page > result.total_pages {
            info!(
                requested = page,
                total_pages = result.total_pages,
                "Requested review page is out of range, loading the last page"
            );
            page = result.total_pages;
            result = api.list_reviews(self.remote_query(page)).await?;
        }

        self.page = clamp_page(page, result.total_pages);
        self.apply(result);
        Ok(())
    }

    fn apply(&mut self, result: Page<AnswerReview>) {
        self.total = result.total;
        self.total_pages = result.total_pages;
        self.rows = result.items.into_iter().map(QueueRow::new).collect();
    }

    /// Marks the row as submitting so the review action disappears until
    /// the request settles.
    pub fn begin_submission(&mut self, review_id: i64) -> Result<AnswerReview> {
        let row = self.row_mut(review_id)?;
        match row.state {
            RowState::Pending => {
                row.state = RowState::Submitting;
                Ok(row.review.clone())
            }
            RowState::Submitting => Err(Error::ReviewInFlight(review_id)),
            RowState::Reviewed => Err(Error::AlreadyReviewed(review_id)),
        }
    }

    /// `Some` carries the reviewed record; `None` puts the row back to pending.
    pub fn finish_submission(&mut self, review_id: i64, reviewed: Option<AnswerReview>) -> Result<()> {
        let row = self.row_mut(review_id)?;
        match reviewed {
            Some(review) => {
                row.review = review;
                row.state = RowState::Reviewed;
            }
            None => row.state = RowState::Pending,
        }
        Ok(())
    }

    pub async fn submit_review(
        &mut self,
        api: &dyn ConsoleApi,
        review_id: i64,
        is_correct: bool,
        points: i32,
    ) -> Result<()> {
        let mut review = self.begin_submission(review_id)?;
        match ReviewSubmission::new(api)
            .submit(&mut review, is_correct, points)
            .await
        {
            Ok(()) => self.finish_submission(review_id, Some(review)),
            Err(e) => {
                warn!(review_id, error = %e, "Review left pending");
                self.finish_submission(review_id, None)?;
                Err(e)
            }
        }
    }

    fn row_mut(&mut self, review_id: i64) -> Result<&mut QueueRow> {
        self.rows
            .iter_mut()
            .find(|r| r.review.id == review_id)
            .ok_or_else(|| Error::NotFound(format!("Answer review {} is not on this page", review_id)))
    }
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}
