use failure::Error;
use thatpos::io::WriteSentence;
use thatpos::{Sentence, Tag};

use crate::progress::SentenceProgress;

// Wrap the sentence processing in a data type. The last (possibly
// incomplete) batch is written by `finish`. The destructor only writes
// it as a fallback when `finish` was not called, errors are then
// printed but cannot be reported.
pub struct SentProcessor<'a, T, W>
where
    T: Tag,
    W: WriteSentence,
{
    tagger: &'a T,
    writer: W,
    batch_size: usize,
    progress: SentenceProgress,
    buffer: Vec<Sentence>,
}

impl<'a, T, W> SentProcessor<'a, T, W>
where
    T: Tag,
    W: WriteSentence,
{
    pub fn new(tagger: &'a T, writer: W, batch_size: usize) -> Self {
        assert!(batch_size > 0, "Batch size should at least be 1.");

        SentProcessor {
            tagger,
            writer,
            batch_size,
            progress: SentenceProgress::new(),
            buffer: Vec::with_capacity(batch_size),
        }
    }

    pub fn process(&mut self, sent: Sentence) -> Result<(), Error> {
        self.buffer.push(sent);

        if self.buffer.len() == self.batch_size {
            self.tag_buffered_sentences()?;
        }

        Ok(())
    }

    /// Tag and write the remaining sentences.
    pub fn finish(mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.tag_buffered_sentences()
    }

    fn tag_buffered_sentences(&mut self) -> Result<(), Error> {
        // Take the buffer first, so that failed batches are not retried
        // when the processor is dropped.
        let mut sents = Vec::with_capacity(self.batch_size);
        std::mem::swap(&mut sents, &mut self.buffer);
        self.tagger.tag_sentences(&mut sents)?;

        // Write out sentences.
        for sent in &sents {
            self.writer.write_sentence(sent)?;
        }

        self.progress.count_sentences(sents.len());

        Ok(())
    }
}

impl<'a, T, W> Drop for SentProcessor<'a, T, W>
where
    T: Tag,
    W: WriteSentence,
{
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            if let Err(err) = self.tag_buffered_sentences() {
                eprintln!("Error tagging sentences: {}", err);
            }
        }
    }
}
