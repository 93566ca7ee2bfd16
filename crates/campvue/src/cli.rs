//! Arguments shared by several subcommands

use campvue_core::query::{check_max_pages, normalize_query, PageRequest, MAX_PAGE_SIZE};

use crate::prelude::*;
use crate::ridb::resources::Paging;

/// Single page by limit/offset, or every page with `--all`
#[derive(Debug, clap::Args, Clone)]
pub struct PagingArgs {
    /// Records per page (1-50)
    #[arg(short, long, default_value_t = MAX_PAGE_SIZE)]
    pub limit: usize,

    /// Records to skip before the page starts
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Page through every record instead of reading one page
    #[arg(long, conflicts_with_all = ["limit", "offset"])]
    pub all: bool,

    /// Upper bound on requests made with --all
    #[arg(long, requires = "all")]
    pub max_pages: Option<usize>,
}

impl PagingArgs {
    pub fn paging(&self, default_max_pages: usize) -> Result<Paging, Error> {
        if self.all {
            let max_pages = check_max_pages(self.max_pages.unwrap_or(default_max_pages))?;
            return Ok(Paging::All { max_pages });
        }

        Ok(Paging::Page(PageRequest::new(self.limit, self.offset)?))
    }
}

/// Substring filter forwarded to RIDB
#[derive(Debug, clap::Args, Clone)]
pub struct QueryArgs {
    /// Only return records matching this text
    #[arg(short, long)]
    pub query: Option<String>,
}

impl QueryArgs {
    pub fn query(&self) -> Option<String> {
        normalize_query(self.query.as_deref())
    }
}
