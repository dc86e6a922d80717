//! Compilation Pipeline
//!
//! Composes segmentation, classification, placement, and redaction
//! extraction over a corpus of chapters and a flat annotation list into
//! one immutable snapshot. Single-pass, synchronous, no ambient state:
//! every input arrives as an argument, and re-running on unchanged input
//! yields byte-identical output.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::classifier;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::ingest::{chapter_ordinal, AnnotationRecord, ChapterSource, UNNUMBERED_ORDINAL};
use crate::model::annotation::{Annotation, AnnotationType, RevealLevel};
use crate::model::character::Character;
use crate::model::document::{
    Chapter, CharacterTimeline, CorpusStats, Page, RedactionEntry, Snapshot,
};
use crate::model::eras;
use crate::position;
use crate::redaction;
use crate::revelation::RevelationIndex;
use crate::segmenter::{NumberingMode, TextSegmenter};

/// A classified annotation waiting for page assignment.
#[derive(Debug, Clone)]
struct ProtoAnnotation {
    id: String,
    character: Character,
    text: String,
    clean_text: String,
    kind: AnnotationType,
    year: Option<i32>,
    reveal_level: RevealLevel,
    embedded: bool,
}

/// The orchestrator: one configured, reusable compilation pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: FolioConfig,
}

impl Pipeline {
    pub fn new(config: FolioConfig) -> Self {
        Self { config }
    }

    /// Compile a corpus of chapters and a flat annotation list into a
    /// snapshot. Missing inputs are fatal; malformed individual records
    /// are defaulted and counted, never fatal.
    pub fn compile(
        &self,
        chapters: Vec<ChapterSource>,
        records: Vec<AnnotationRecord>,
    ) -> Result<Snapshot> {
        if chapters.is_empty() {
            return Err(FolioError::MissingChapters);
        }
        if records.is_empty() {
            return Err(FolioError::MissingAnnotations);
        }

        log::info!(
            "Compiling {} chapter(s) with {} annotation record(s)",
            chapters.len(),
            records.len()
        );

        // Stable input ordering: sort by chapter ordinal, unnumbered
        // chapters last in their original relative order.
        let mut sources = chapters;
        for source in &sources {
            if chapter_ordinal(&source.label).is_none() {
                log::warn!("Chapter {:?} has no parseable ordinal, sorting last", source.label);
            }
        }
        sources.sort_by_key(|c| chapter_ordinal(&c.label).unwrap_or(UNNUMBERED_ORDINAL));

        let segmenter = TextSegmenter::new(self.config.pagination.clone());
        let mut chapters: Vec<Chapter> = Vec::with_capacity(sources.len());
        let mut redactions: Vec<RedactionEntry> = Vec::new();
        let mut queues: Vec<Vec<ProtoAnnotation>> = Vec::with_capacity(sources.len());

        for source in &sources {
            let ordinal = chapter_ordinal(&source.label).unwrap_or(UNNUMBERED_ORDINAL);
            let slices = segmenter.paginate(&source.text);
            let pages: Vec<Page> = slices
                .into_iter()
                .map(|slice| {
                    let spans = redaction::extract(&slice.text).spans;
                    Page {
                        number: 0, // assigned below, once the scope is known
                        chapter: source.label.clone(),
                        word_count: slice.word_count,
                        text: slice.text,
                        annotations: Vec::new(),
                        redacted_spans: spans,
                    }
                })
                .collect();

            // Corpus-wide redaction scan runs over the raw chapter text,
            // independent of pagination.
            for span in redaction::extract(&source.text).spans {
                redactions.push(RedactionEntry {
                    chapter_ordinal: ordinal,
                    chapter: source.label.clone(),
                    span,
                });
            }

            let word_count = pages.iter().map(|p| p.word_count).sum();
            queues.push(self.embedded_queue(source, ordinal));
            chapters.push(Chapter { ordinal, name: source.label.clone(), pages, word_count });
        }

        assign_page_numbers(&mut chapters, self.config.pagination.numbering);
        self.queue_external_records(&records, &sources, &mut queues);

        let overflow = self.place_annotations(&mut chapters, queues);
        link_related(&mut chapters);

        let timelines = build_timelines(&chapters);
        let mut stats = build_stats(&chapters);
        stats.overflow_annotations = overflow;
        stats.redacted_spans = redactions.len();

        Ok(Snapshot {
            title: self.config.document.title.clone(),
            author: self.config.document.author.clone(),
            chapters,
            timelines,
            revelation: RevelationIndex::standard(),
            redactions,
            stats,
        })
    }

    /// Reduced snapshot for constrained consumers: the first N chapters,
    /// pages, and annotations per page, with rollups and counters
    /// recomputed over the subset.
    pub fn preview(&self, snapshot: &Snapshot) -> Snapshot {
        let limits = &self.config.preview;

        let mut chapters: Vec<Chapter> =
            snapshot.chapters.iter().take(limits.chapters).cloned().collect();
        for chapter in &mut chapters {
            chapter.pages.truncate(limits.pages_per_chapter);
            for page in &mut chapter.pages {
                page.annotations.truncate(limits.annotations_per_page);
            }
            chapter.word_count = chapter.pages.iter().map(|p| p.word_count).sum();
        }

        let kept: HashSet<u32> = chapters.iter().map(|c| c.ordinal).collect();
        let redactions: Vec<RedactionEntry> = snapshot
            .redactions
            .iter()
            .filter(|r| kept.contains(&r.chapter_ordinal))
            .cloned()
            .collect();

        let timelines = build_timelines(&chapters);
        let mut stats = build_stats(&chapters);
        stats.redacted_spans = redactions.len();

        Snapshot {
            title: snapshot.title.clone(),
            author: snapshot.author.clone(),
            chapters,
            timelines,
            revelation: snapshot.revelation.clone(),
            redactions,
            stats,
        }
    }

    /// Embedded annotations for one chapter, in discovery order.
    fn embedded_queue(&self, source: &ChapterSource, ordinal: u32) -> Vec<ProtoAnnotation> {
        if !self.config.placement.extract_embedded {
            return Vec::new();
        }

        classifier::extract_embedded(&source.text)
            .into_iter()
            .enumerate()
            .map(|(i, note)| {
                let id = format!("emb_{ordinal}_{i}_{}", note.character.as_str());
                ProtoAnnotation {
                    id,
                    character: note.character,
                    clean_text: classifier::clean_text(&note.text),
                    kind: classifier::annotation_kind(&note.text, note.year),
                    reveal_level: classifier::reveal_level(note.character, note.year, &note.text),
                    year: note.year,
                    text: note.text,
                    embedded: true,
                }
            })
            .collect()
    }

    /// Classify external records and append them to their chapter's queue,
    /// after the embedded annotations. Records without a matching chapter
    /// reference are distributed round-robin so they stay visible.
    fn queue_external_records(
        &self,
        records: &[AnnotationRecord],
        sources: &[ChapterSource],
        queues: &mut [Vec<ProtoAnnotation>],
    ) {
        let mut homeless = 0usize;

        for (i, record) in records.iter().enumerate() {
            let explicit = record.character.as_ref().and_then(|f| f.normalize());
            let classified = classifier::classify(explicit, &record.text, record.year);
            let id = record.id.clone().unwrap_or_else(|| format!("ann_{i}"));

            let proto = ProtoAnnotation {
                id,
                character: classified.character,
                text: record.text.clone(),
                clean_text: classified.clean_text,
                kind: classified.kind,
                year: classified.year,
                reveal_level: classified.reveal_level,
                embedded: false,
            };

            let target = record
                .chapter
                .as_deref()
                .and_then(|label| sources.iter().position(|s| s.label == label))
                .unwrap_or_else(|| {
                    let t = homeless % queues.len();
                    homeless += 1;
                    t
                });
            queues[target].push(proto);
        }
    }

    /// Fill pages front to back, embedded annotations first, up to the
    /// per-page cap. Returns how many annotations found no slot.
    fn place_annotations(
        &self,
        chapters: &mut [Chapter],
        queues: Vec<Vec<ProtoAnnotation>>,
    ) -> usize {
        let cap = self.config.placement.per_page_cap;
        let mut overflow = 0usize;

        for (chapter, queue) in chapters.iter_mut().zip(queues) {
            let mut pending = queue.into_iter();

            for page in &mut chapter.pages {
                while page.annotations.len() < cap {
                    let Some(proto) = pending.next() else { break };
                    let index = page.annotations.len();
                    let pos =
                        position::generate(&proto.id, proto.character, proto.year, index);
                    page.annotations.push(Annotation {
                        position: pos,
                        draggable: proto.kind == AnnotationType::InteractiveNote
                            && proto.year.is_some_and(|y| y >= eras::MODERN_YEAR),
                        id: proto.id,
                        character: proto.character,
                        text: proto.text,
                        clean_text: proto.clean_text,
                        kind: proto.kind,
                        year: proto.year,
                        chapter: Some(chapter.name.clone()),
                        reveal_level: proto.reveal_level,
                        embedded: proto.embedded,
                        related: Vec::new(),
                    });
                }
            }

            let dropped = pending.count();
            if dropped > 0 {
                log::warn!(
                    "Chapter {:?}: {dropped} annotation(s) dropped, every page at cap {cap}",
                    chapter.name
                );
                overflow += dropped;
            }
        }

        overflow
    }
}

/// Assign page numbers according to the configured scope.
fn assign_page_numbers(chapters: &mut [Chapter], mode: NumberingMode) {
    let mut counter = 0usize;
    for chapter in chapters {
        if mode == NumberingMode::PerChapter {
            counter = 0;
        }
        for page in &mut chapter.pages {
            counter += 1;
            page.number = counter;
        }
    }
}

/// Link annotations that share more than two words, capped at three
/// related ids each. Weak references only; order follows document order.
fn link_related(chapters: &mut [Chapter]) {
    const MAX_RELATED: usize = 3;
    const MIN_SHARED_WORDS: usize = 3;

    let keyed: Vec<(String, HashSet<String>)> = chapters
        .iter()
        .flat_map(|c| c.pages.iter())
        .flat_map(|p| p.annotations.iter())
        .map(|a| {
            let words: HashSet<String> =
                a.clean_text.to_lowercase().split_whitespace().map(String::from).collect();
            (a.id.clone(), words)
        })
        .collect();

    for chapter in chapters {
        for page in &mut chapter.pages {
            for annotation in &mut page.annotations {
                let words: HashSet<String> = annotation
                    .clean_text
                    .to_lowercase()
                    .split_whitespace()
                    .map(String::from)
                    .collect();
                annotation.related = keyed
                    .iter()
                    .filter(|(id, other)| {
                        *id != annotation.id
                            && words.intersection(other).count() >= MIN_SHARED_WORDS
                    })
                    .take(MAX_RELATED)
                    .map(|(id, _)| id.clone())
                    .collect();
            }
        }
    }
}

/// Chronological per-character rollups, canonical discovery order,
/// characters with no annotations omitted.
fn build_timelines(chapters: &[Chapter]) -> IndexMap<String, CharacterTimeline> {
    let mut timelines = IndexMap::new();

    for character in Character::ALL {
        let mut entries: Vec<(i32, &str)> = chapters
            .iter()
            .flat_map(|c| c.pages.iter())
            .flat_map(|p| p.annotations.iter())
            .filter(|a| a.character == character)
            .map(|a| (a.year.unwrap_or(eras::DEFAULT_TIMELINE_YEAR), a.id.as_str()))
            .collect();
        if entries.is_empty() {
            continue;
        }
        entries.sort();

        let years: Vec<i32> = chapters
            .iter()
            .flat_map(|c| c.pages.iter())
            .flat_map(|p| p.annotations.iter())
            .filter(|a| a.character == character)
            .filter_map(|a| a.year)
            .collect();

        timelines.insert(
            character.as_str().to_string(),
            CharacterTimeline {
                character,
                full_name: character.full_name().to_string(),
                role: character.role().to_string(),
                active_years: character.active_years().to_string(),
                annotation_ids: entries.into_iter().map(|(_, id)| id.to_string()).collect(),
                first_year: years.iter().min().copied(),
                last_year: years.iter().max().copied(),
            },
        );
    }

    timelines
}

/// Corpus-wide counters over the placed annotations.
fn build_stats(chapters: &[Chapter]) -> CorpusStats {
    let mut stats = CorpusStats {
        total_chapters: chapters.len(),
        total_pages: chapters.iter().map(|c| c.pages.len()).sum(),
        total_words: chapters.iter().map(|c| c.word_count).sum(),
        ..CorpusStats::default()
    };

    for character in Character::ALL {
        stats.per_character.insert(character.as_str().to_string(), 0);
    }

    for annotation in chapters.iter().flat_map(|c| c.pages.iter()).flat_map(|p| p.annotations.iter())
    {
        stats.total_annotations += 1;
        if annotation.embedded {
            stats.embedded_annotations += 1;
        }
        if annotation.character == Character::Unknown {
            stats.unknown_character += 1;
        }
        *stats
            .per_character
            .entry(annotation.character.as_str().to_string())
            .or_insert(0) += 1;
        stats.per_tier[(annotation.reveal_level.ordinal() - 1) as usize] += 1;
    }

    stats
}
