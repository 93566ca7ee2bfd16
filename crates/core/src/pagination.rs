//! Paged aggregation state machine
//!
//! RIDB list endpoints return at most [`MAX_PAGE_SIZE`](crate::query::MAX_PAGE_SIZE)
//! records per request and only sometimes say how many records exist in total.
//! [`Aggregation`] decides, page by page, whether another request is needed. It
//! performs no I/O: the caller asks for the next [`PageRequest`], fetches that page
//! however it likes, feeds the result back through [`Aggregation::accept`] and
//! then calls [`Aggregation::evaluate`] to apply the stop conditions.
//!
//! Stop conditions, in precedence order:
//!
//! 1. the page came back empty
//! 2. the collected count reached the last reported total
//! 3. the page was shorter than the page size
//! 4. the page budget ran out (a silent truncation, flagged on the result)
//!
//! A page of exactly `page_size` records with no total to resolve it costs one
//! extra round trip: only the next page can tell whether it was the last one.

use serde::Serialize;

use crate::query::{check_max_pages, PageRequest, ParameterError};
use crate::ridb::Page;

/// Why an aggregation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    EmptyPage,
    TotalReached,
    ShortPage,
    MaxPages,
}

/// Where an aggregation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the page described by [`Aggregation::next_request`]
    Fetching,
    /// A page of `returned` records was accepted; [`Aggregation::evaluate`]
    /// decides what comes next
    Evaluating { returned: usize },
    Done(StopReason),
    /// A fetch failed; everything collected so far was discarded
    Failed,
}

/// Page size, starting offset and page budget for one aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPlan {
    pub page_size: usize,
    pub start_offset: usize,
    pub max_pages: usize,
}

impl AggregationPlan {
    pub fn new(
        page_size: usize,
        start_offset: usize,
        max_pages: usize,
    ) -> Result<Self, ParameterError> {
        let first = PageRequest::new(page_size, start_offset)?;

        Ok(Self {
            page_size: first.limit,
            start_offset: first.offset,
            max_pages: check_max_pages(max_pages)?,
        })
    }

    /// Page through everything starting where `request` points
    pub fn from_request(request: PageRequest, max_pages: usize) -> Result<Self, ParameterError> {
        Self::new(request.limit, request.offset, max_pages)
    }
}

/// Records collected by a finished aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregated<T> {
    pub items: Vec<T>,
    pub stop: StopReason,
    pub pages_fetched: usize,
    pub known_total: Option<u64>,
}

impl<T> Aggregated<T> {
    /// True when the page budget ran out before any other stop condition fired
    pub fn is_truncated(&self) -> bool {
        self.stop == StopReason::MaxPages
    }
}

/// State of one aggregation. Owned by a single caller; never shared.
#[derive(Debug)]
pub struct Aggregation<T> {
    plan: AggregationPlan,
    collected: Vec<T>,
    offset: usize,
    pages_fetched: usize,
    known_total: Option<u64>,
    phase: Phase,
}

impl<T> Aggregation<T> {
    pub fn new(plan: AggregationPlan) -> Self {
        Self {
            plan,
            collected: Vec::new(),
            offset: plan.start_offset,
            pages_fetched: 0,
            known_total: None,
            phase: Phase::Fetching,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn collected_len(&self) -> usize {
        self.collected.len()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn known_total(&self) -> Option<u64> {
        self.known_total
    }

    /// The page to fetch next, or `None` once the aggregation is over
    pub fn next_request(&self) -> Option<PageRequest> {
        match self.phase {
            Phase::Fetching => Some(PageRequest {
                limit: self.plan.page_size,
                offset: self.offset,
            }),
            _ => None,
        }
    }

    /// Feed back the page returned for [`Self::next_request`] and move to
    /// `Evaluating`.
    ///
    /// Pages offered outside the `Fetching` phase are ignored.
    pub fn accept(&mut self, page: Page<T>) -> Phase {
        if self.phase != Phase::Fetching {
            return self.phase;
        }

        self.pages_fetched += 1;
        let returned = page.returned_count();

        if returned > 0 {
            self.collected.extend(page.records);
            if let Some(total) = page.total_count {
                self.known_total = Some(total);
            }
        }

        self.phase = Phase::Evaluating { returned };
        self.phase
    }

    /// Apply the stop conditions to the last accepted page. Moves to `Done` or
    /// back to `Fetching`; outside `Evaluating` this is a no-op.
    pub fn evaluate(&mut self) -> Phase {
        if let Phase::Evaluating { returned } = self.phase {
            self.phase = self.next_phase(returned);
        }
        self.phase
    }

    fn next_phase(&mut self, returned: usize) -> Phase {
        if returned == 0 {
            return Phase::Done(StopReason::EmptyPage);
        }

        if let Some(total) = self.known_total {
            if self.collected.len() as u64 >= total {
                return Phase::Done(StopReason::TotalReached);
            }
        }

        if returned < self.plan.page_size {
            return Phase::Done(StopReason::ShortPage);
        }

        self.offset += self.plan.page_size;

        if self.pages_fetched >= self.plan.max_pages {
            return Phase::Done(StopReason::MaxPages);
        }

        Phase::Fetching
    }

    /// Abandon the aggregation. Partial results are discarded.
    pub fn fail(&mut self) {
        self.collected.clear();
        self.phase = Phase::Failed;
    }

    /// Hand back the collected records. Returns the current phase as the error
    /// if the aggregation has not reached `Done`.
    pub fn finish(self) -> Result<Aggregated<T>, Phase> {
        match self.phase {
            Phase::Done(stop) => Ok(Aggregated {
                items: self.collected,
                stop,
                pages_fetched: self.pages_fetched,
                known_total: self.known_total,
            }),
            phase => Err(phase),
        }
    }
}
