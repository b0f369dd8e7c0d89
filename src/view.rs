//! Mapping from query state to a presentation.
//!
//! [`present`] is the single place that decides what a screen shows for a
//! given [`QueryState`]. It is total: every reachable state selects exactly
//! one [`Presentation`], so no combination ever produces a blank render. The
//! precedence is fixed: loading, then failure, then the caller's "record is
//! missing" predicate, then the "collection is empty" predicate, then
//! content.
//!
//! Failure is presented generically; the classified [`ErrorKind`] never
//! carries raw transport detail, and screens should show
//! [`FAILED_MESSAGE`] rather than anything derived from the error.
//!
//! [`ErrorKind`]: crate::transport::ErrorKind

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::query::QueryState;

/// User-facing text for the standard non-content presentations.
pub const LOADING_MESSAGE: &str = "Loading...";
pub const FAILED_MESSAGE: &str = "Something went wrong.";
pub const NO_RESULTS_MESSAGE: &str = "No results";

/// What a screen should show for a query state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a, T> {
    /// Lazy query, not yet triggered.
    Idle,
    /// An attempt is in flight.
    Loading,
    /// The attempt failed; show a generic failure message.
    Failed,
    /// The query succeeded but the requested record does not exist.
    NotFound,
    /// The query succeeded with an empty collection.
    NoResults,
    /// The query succeeded; render the payload.
    Content(&'a T),
}

/// Select the presentation for `state`.
///
/// `is_missing` recognizes a successful payload whose requested record is
/// absent (e.g. a detail query that returned null); `is_empty` recognizes an
/// empty collection. Both are explicit predicates on the payload, evaluated
/// only in the success phase and in that order.
pub fn present<'a, T>(
    state: &'a QueryState<T>,
    is_missing: impl FnOnce(&T) -> bool,
    is_empty: impl FnOnce(&T) -> bool,
) -> Presentation<'a, T> {
    match state {
        QueryState::Idle => Presentation::Idle,
        QueryState::Loading => Presentation::Loading,
        QueryState::Error(_) => Presentation::Failed,
        QueryState::Success(data) => {
            if is_missing(data) {
                Presentation::NotFound
            } else if is_empty(data) {
                Presentation::NoResults
            } else {
                Presentation::Content(data)
            }
        }
    }
}

/// A bordered one-line notice, used for every non-content presentation.
pub fn notice(frame: &mut Frame<'_>, area: Rect, title: &str, text: &str) {
    let paragraph =
        Paragraph::new(text.to_string()).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}
