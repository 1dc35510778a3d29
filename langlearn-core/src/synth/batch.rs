use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::{naming, Clip, Synthesizer};
use crate::audio::writer::write_atomic;
use crate::error::{Result, TtsError};
use crate::types::{
    BatchItem, BatchReport, BatchRequest, ItemFailure, MergeStrategy, SynthesisResult,
};

/// Runs a batch in input order. With `concurrency > 1` items are
/// synthesized in parallel but results are still yielded in input order.
pub struct BatchRunner<'a> {
    synth: &'a Synthesizer,
    concurrency: usize,
}

impl<'a> BatchRunner<'a> {
    pub fn new(synth: &'a Synthesizer, concurrency: usize) -> Self {
        Self {
            synth,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(&self, request: &BatchRequest, output_dir: &Path) -> Result<BatchReport> {
        if request.items.is_empty() {
            return Err(TtsError::InvalidBatchInput(
                "batch contains no items".to_string(),
            ));
        }

        match request.merge {
            MergeStrategy::OneFilePerInput => Ok(self.run_separate(request, output_dir).await),
            MergeStrategy::OneFilePerBatch => self.run_merged(request, output_dir).await,
        }
    }

    async fn render(&self, item: &BatchItem) -> Result<Clip> {
        match item {
            BatchItem::Single(request) => self.synth.synthesize(request).await,
            BatchItem::Pair(pair) => self.synth.synthesize_pair(pair).await,
        }
    }

    async fn render_and_write(
        &self,
        index: usize,
        item: &BatchItem,
        output_dir: &Path,
    ) -> Result<SynthesisResult> {
        let clip = self.synth.encode(self.render(item).await?).await?;
        let file_path = output_dir.join(naming::batch_item_filename(index, item));
        write_atomic(&file_path, &clip.audio.data)?;

        Ok(SynthesisResult {
            file_path,
            text: item.text(),
            voice: clip.voice,
            duration_ms: clip.audio.duration_ms(),
        })
    }

    /// Every item gets its own file; failures are collected, never raised
    async fn run_separate(&self, request: &BatchRequest, output_dir: &Path) -> BatchReport {
        let outcomes: Vec<(usize, Result<SynthesisResult>)> =
            stream::iter(0..request.items.len())
                .map(|index| {
                    let item = &request.items[index];
                    async move { (index, self.render_and_write(index, item, output_dir).await) }
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut report = BatchReport::default();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    warn!(index, error = %e, "Batch item failed");
                    report
                        .failures
                        .push(ItemFailure::new(index, request.items[index].text(), &e));
                }
            }
        }

        info!(
            succeeded = report.results.len(),
            failed = report.failures.len(),
            "Batch finished"
        );
        report
    }

    /// One file for the whole batch; the first failing item aborts it
    async fn run_merged(&self, request: &BatchRequest, output_dir: &Path) -> Result<BatchReport> {
        // Every item is validated before the first provider call
        for (index, item) in request.items.iter().enumerate() {
            self.synth
                .validate(item)
                .await
                .map_err(|source| merge_aborted(index, source))?;
        }

        let mut rendered = stream::iter(0..request.items.len())
            .map(|index| {
                let item = &request.items[index];
                async move { (index, self.render(item).await) }
            })
            .buffered(self.concurrency);

        let mut clips = Vec::with_capacity(request.items.len());
        let mut voices: Vec<String> = Vec::new();
        while let Some((index, outcome)) = rendered.next().await {
            let clip = outcome.map_err(|source| merge_aborted(index, source))?;
            if !voices.contains(&clip.voice) {
                voices.push(clip.voice.clone());
            }
            clips.push(clip.audio);
        }

        let merged = self
            .synth
            .stitcher()
            .concatenate(&clips, request.pause.as_duration())
            .await?;

        let file_path = output_dir.join(naming::merged_filename(&request.items));
        write_atomic(&file_path, &merged.data)?;
        info!(?file_path, items = clips.len(), "Merged batch written");

        let text = request
            .items
            .iter()
            .map(BatchItem::text)
            .collect::<Vec<_>>()
            .join(" | ");

        Ok(BatchReport {
            results: vec![SynthesisResult {
                file_path,
                text,
                voice: voices.join("+"),
                duration_ms: merged.duration_ms(),
            }],
            failures: Vec::new(),
        })
    }
}

fn merge_aborted(index: usize, source: TtsError) -> TtsError {
    warn!(index, error = %source, "Aborting merged batch");
    TtsError::BatchMergeAborted {
        index,
        source: Box::new(source),
    }
}
