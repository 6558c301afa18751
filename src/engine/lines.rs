//! Line reconstruction from positioned tokens.
//!
//! Tokens are bucketed into vertical bands per page, ordered left to right
//! within a band, and joined into one text string per line. The grouping
//! is stable: re-running on the same token set yields identical line order
//! and content, and no token is ever dropped.

use std::collections::BTreeMap;

use crate::model::Token;

/// One reconstructed visual line.
///
/// Lines are ephemeral; they exist only between line reconstruction and
/// record assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Token texts joined with single spaces, left to right.
    pub text: String,
    /// Reference vertical position of the band (mean of token centers).
    pub top: f32,
    /// Left edge of the leftmost token.
    pub x0: f32,
    /// Zero-based page index.
    pub page: u32,
}

/// Cluster a page-ordered token slice into visual lines.
///
/// Pages are processed in ascending index order; tokens within a page are
/// banded by vertical center using `tolerance`. Tokens with identical
/// positions collide deterministically: the original slice index is the
/// tie-break everywhere a coordinate comparison is equal.
pub fn reconstruct(tokens: &[Token], tolerance: f32) -> Vec<Line> {
    if tokens.is_empty() {
        return vec![];
    }

    // Group token indices by page; BTreeMap keeps pages in document order.
    let mut pages: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, token) in tokens.iter().enumerate() {
        pages.entry(token.page).or_default().push(i);
    }

    let mut lines = Vec::new();
    for (_, indices) in pages {
        lines.extend(reconstruct_page(tokens, indices, tolerance));
    }
    lines
}

/// Band one page's tokens into lines.
fn reconstruct_page(tokens: &[Token], mut indices: Vec<usize>, tolerance: f32) -> Vec<Line> {
    // Stable sort by vertical center; equal centers keep slice order.
    indices.sort_by(|&a, &b| {
        tokens[a]
            .center_y()
            .partial_cmp(&tokens[b].center_y())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut bands: Vec<Vec<usize>> = Vec::new();
    let mut band_ref: Option<f32> = None;

    for idx in indices {
        let center = tokens[idx].center_y();
        match band_ref {
            Some(reference) if (center - reference).abs() < tolerance => {
                bands.last_mut().unwrap().push(idx);
            }
            _ => {
                band_ref = Some(center);
                bands.push(vec![idx]);
            }
        }
    }

    bands
        .into_iter()
        .map(|mut band| {
            // Left-to-right within the band; original index breaks X ties.
            band.sort_by(|&a, &b| {
                tokens[a]
                    .x0
                    .partial_cmp(&tokens[b].x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let text = band
                .iter()
                .map(|&i| tokens[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let top =
                band.iter().map(|&i| tokens[i].center_y()).sum::<f32>() / band.len() as f32;
            let x0 = tokens[band[0]].x0;
            let page = tokens[band[0]].page;

            Line {
                text,
                top,
                x0,
                page,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, x0: f32, top: f32, page: u32) -> Token {
        Token::new(text, x0, x0 + text.len() as f32 * 6.0, top, top + 10.0, page)
    }

    #[test]
    fn test_tokens_cluster_within_tolerance() {
        let tokens = vec![
            tok("262112705", 20.0, 100.0, 0),
            tok("MOHIT", 90.0, 102.0, 0),
            tok("TOTAL", 20.0, 120.0, 0),
        ];
        let lines = reconstruct(&tokens, 5.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "262112705 MOHIT");
        assert_eq!(lines[1].text, "TOTAL");
    }

    #[test]
    fn test_left_to_right_order_independent_of_input_order() {
        let tokens = vec![
            tok("MALI", 200.0, 100.0, 0),
            tok("262112705", 20.0, 100.0, 0),
            tok("MOHIT", 90.0, 100.0, 0),
        ];
        let lines = reconstruct(&tokens, 5.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "262112705 MOHIT MALI");
        assert_eq!(lines[0].x0, 20.0);
    }

    #[test]
    fn test_identical_positions_keep_input_order() {
        let tokens = vec![
            tok("FIRST", 50.0, 80.0, 0),
            tok("SECOND", 50.0, 80.0, 0),
        ];
        let lines = reconstruct(&tokens, 5.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "FIRST SECOND");
    }

    #[test]
    fn test_reconstruction_is_stable() {
        let tokens = vec![
            tok("B", 60.0, 50.0, 0),
            tok("A", 10.0, 48.0, 0),
            tok("D", 60.0, 90.0, 0),
            tok("C", 10.0, 91.0, 0),
        ];
        let first = reconstruct(&tokens, 5.0);
        let second = reconstruct(&tokens, 5.0);
        assert_eq!(first, second);
        assert_eq!(first[0].text, "A B");
        assert_eq!(first[1].text, "C D");
    }

    #[test]
    fn test_pages_ordered_and_separated() {
        let tokens = vec![
            tok("PAGE TWO", 10.0, 40.0, 1),
            tok("PAGE ONE", 10.0, 40.0, 0),
        ];
        let lines = reconstruct(&tokens, 5.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "PAGE ONE");
        assert_eq!(lines[0].page, 0);
        assert_eq!(lines[1].text, "PAGE TWO");
        assert_eq!(lines[1].page, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct(&[], 5.0).is_empty());
    }
}
