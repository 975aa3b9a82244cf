//! Borrower-name search.

use crate::loan::Loan;

/// Lazy, restartable search over a slice of loans.
///
/// Cloning a `Search` gives an independent cursor from the same position, so
/// a caller can walk the matches once to render and again to summarize.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    loans: core::slice::Iter<'a, Loan>,
    needle: String,
}

/// Loans whose name contains `query`, ignoring case, in ledger order.
///
/// An empty query matches everything.
pub fn search<'a>(loans: &'a [Loan], query: &str) -> Search<'a> {
    Search {
        loans: loans.iter(),
        needle: query.to_lowercase(),
    }
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a Loan;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.loans.find(|loan| loan.name_contains(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.loans.size_hint().1)
    }
}

impl core::iter::FusedIterator for Search<'_> {}
