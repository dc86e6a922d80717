//! Text Segmentation
//!
//! Paragraph-aware pagination of raw chapter text. Paragraphs are never
//! split: a page closes when the next paragraph would push it past the
//! word budget, and a single oversized paragraph becomes its own page.
//! Joining a chapter's pages back together reconstructs the original
//! paragraph sequence exactly.

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Separator used when joining paragraphs into a page. Splitting page text
/// on this exact string undoes pagination losslessly.
pub const PARAGRAPH_JOIN: &str = "\n\n";

/// Page numbering scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingMode {
    /// One counter spanning the whole corpus, in chapter-ordinal order
    Continuous,
    /// Counter resets to 1 at each chapter boundary
    #[default]
    PerChapter,
}

/// An unnumbered page produced by segmentation. The pipeline assigns
/// numbers afterwards according to the numbering mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    pub text: String,
    pub word_count: usize,
}

/// Paragraph-accumulating segmenter.
#[derive(Debug, Clone)]
pub struct TextSegmenter {
    config: PaginationConfig,
}

impl TextSegmenter {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Split raw text into trimmed, non-empty, blank-line-delimited
    /// paragraphs.
    pub fn split_paragraphs(text: &str) -> Vec<&str> {
        text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()).collect()
    }

    /// Cut chapter text into page slices.
    ///
    /// With `paragraphs_per_page` set, pages take a fixed paragraph count.
    /// Otherwise paragraphs accumulate until the next one would exceed
    /// `max_words`; only the final page may fall under `min_words`, and a
    /// lone paragraph longer than `max_words` forms its own oversized page.
    pub fn paginate(&self, text: &str) -> Vec<PageSlice> {
        let paragraphs = Self::split_paragraphs(text);
        if paragraphs.is_empty() {
            return Vec::new();
        }

        match self.config.paragraphs_per_page {
            Some(n) => Self::paginate_by_count(&paragraphs, n.max(1)),
            None => Self::paginate_by_words(&paragraphs, self.config.max_words),
        }
    }

    fn paginate_by_count(paragraphs: &[&str], per_page: usize) -> Vec<PageSlice> {
        paragraphs.chunks(per_page).map(|chunk| Self::close_page(chunk)).collect()
    }

    fn paginate_by_words(paragraphs: &[&str], max_words: usize) -> Vec<PageSlice> {
        let mut pages = Vec::new();
        let mut buffer: Vec<&str> = Vec::new();
        let mut buffered_words = 0usize;

        for &para in paragraphs {
            let para_words = count_words(para);
            if buffered_words + para_words > max_words && !buffer.is_empty() {
                pages.push(Self::close_page(&buffer));
                buffer.clear();
                buffered_words = 0;
            }
            buffer.push(para);
            buffered_words += para_words;
        }

        if !buffer.is_empty() {
            pages.push(Self::close_page(&buffer));
        }

        pages
    }

    fn close_page(paragraphs: &[&str]) -> PageSlice {
        let text = paragraphs.join(PARAGRAPH_JOIN);
        let word_count = count_words(&text);
        PageSlice { text, word_count }
    }
}

/// Whitespace-delimited word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: usize, max: usize) -> TextSegmenter {
        TextSegmenter::new(PaginationConfig {
            min_words: min,
            max_words: max,
            paragraphs_per_page: None,
            ..PaginationConfig::default()
        })
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_three_even_paragraphs_in_band() {
        // Three 200-word paragraphs against a [150, 250] band: each closes
        // its own page, all under the cap.
        let text = format!("{}\n\n{}\n\n{}", words(200), words(200), words(200));
        let pages = band(150, 250).paginate(&text);

        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert!(page.word_count <= 250);
            assert_eq!(page.word_count, 200);
        }
    }

    #[test]
    fn test_small_paragraphs_accumulate() {
        let text = format!("{}\n\n{}\n\n{}\n\n{}", words(80), words(80), words(80), words(80));
        let pages = band(150, 250).paginate(&text);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].word_count, 240);
        assert_eq!(pages[1].word_count, 80); // final page may run short
    }

    #[test]
    fn test_oversized_paragraph_gets_own_page() {
        let text = format!("{}\n\n{}\n\n{}", words(50), words(400), words(50));
        let pages = band(150, 250).paginate(&text);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].word_count, 50);
        assert_eq!(pages[1].word_count, 400); // never split mid-paragraph
        assert_eq!(pages[2].word_count, 50);
    }

    #[test]
    fn test_pagination_is_lossless() {
        let paragraphs: Vec<String> = (0..13).map(|i| words(40 + i * 17)).collect();
        let text = paragraphs.join("\n\n");
        let pages = band(150, 250).paginate(&text);

        let rejoined: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.text.split(PARAGRAPH_JOIN))
            .collect();
        let original: Vec<&str> = TextSegmenter::split_paragraphs(&text);
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_fixed_paragraph_count_mode() {
        let segmenter = TextSegmenter::new(PaginationConfig {
            paragraphs_per_page: Some(3),
            ..PaginationConfig::default()
        });
        let text = (0..7).map(|_| words(10)).collect::<Vec<_>>().join("\n\n");
        let pages = segmenter.paginate(&text);

        assert_eq!(pages.len(), 3); // 3 + 3 + 1
        assert_eq!(pages[2].word_count, 10);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(band(150, 250).paginate("").is_empty());
        assert!(band(150, 250).paginate("\n\n   \n\n").is_empty());
    }

    #[test]
    fn test_numbering_mode_default_is_per_chapter() {
        assert_eq!(NumberingMode::default(), NumberingMode::PerChapter);
    }
}
