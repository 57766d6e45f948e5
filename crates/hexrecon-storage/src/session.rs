//! Selection and autosave logic for an interactive labeling session.
//!
//! The session decides which image a human should label next. Early on it
//! mostly shows unlabeled images; as the pool of unlabeled images shrinks it
//! shifts toward images with a single vote so they get confirmed.

use hexrecon_core::config::StoreConfig;
use hexrecon_core::constants::{DEFAULT_AUTOSAVE_EVERY, DEFAULT_MIN_CONFIRMATIONS};
use hexrecon_core::{ImageId, Label, LabelRecord, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::store::LabelStore;

/// What the session wants labeled next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextImage {
    /// Enough labels are confirmed.
    Finished,
    /// An image with one vote that needs a second opinion.
    Verify(ImageId),
    /// An image nobody has labeled yet.
    Novel(ImageId),
    /// Not finished, but no image has a count of 0 or 1 left to show.
    Exhausted,
}

impl NextImage {
    pub fn image(&self) -> Option<&ImageId> {
        match self {
            NextImage::Verify(id) | NextImage::Novel(id) => Some(id),
            NextImage::Finished | NextImage::Exhausted => None,
        }
    }
}

pub struct LabelingSession<'a, R: Rng = StdRng> {
    store: &'a LabelStore,
    target: usize,
    bias: f64,
    min_confirmations: u32,
    autosave_every: u32,
    since_save: u32,
    rng: R,
}

impl<'a> LabelingSession<'a, StdRng> {
    /// Session over `store` aiming for `target` confirmed labels.
    pub fn new(store: &'a LabelStore, target: usize, bias: f64) -> Self {
        Self::with_rng(store, target, bias, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new), with the autosave cadence from `config`.
    pub fn from_config(store: &'a LabelStore, target: usize, bias: f64, config: &StoreConfig) -> Self {
        Self::new(store, target, bias).autosave_every(config.effective_autosave_every())
    }
}

impl<'a, R: Rng> LabelingSession<'a, R> {
    pub fn with_rng(store: &'a LabelStore, target: usize, bias: f64, rng: R) -> Self {
        Self {
            store,
            target,
            bias,
            min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
            autosave_every: DEFAULT_AUTOSAVE_EVERY,
            since_save: 0,
            rng,
        }
    }

    pub fn min_confirmations(mut self, n: u32) -> Self {
        self.min_confirmations = n;
        self
    }

    /// Persist after every `n` recorded labels. Zero disables autosave.
    pub fn autosave_every(mut self, n: u32) -> Self {
        self.autosave_every = n;
        self
    }

    /// Number of identities confirmed so far.
    pub fn done(&self) -> Result<usize, StoreError> {
        self.store.count_at_least(self.min_confirmations)
    }

    /// Probability of showing a novel image rather than verifying one.
    pub fn novel_probability(&self) -> Result<f64, StoreError> {
        if self.target == 0 {
            return Ok(0.0);
        }
        let done = self.done()? as f64;
        let unverified = self.store.count_exactly(1)? as f64;
        let target = self.target as f64;
        let fraction_unlabeled = (target - done - unverified) / target;
        Ok(fraction_unlabeled * (1.0 + self.bias))
    }

    /// Pick the next image to label.
    pub fn next_image(&mut self) -> Result<NextImage, StoreError> {
        let done = self.done()?;
        if done >= self.target {
            return Ok(NextImage::Finished);
        }

        let unverified = self.store.count_exactly(1)?;
        let p_novel = self.novel_probability()?;
        let verify = unverified > 0 && self.rng.gen::<f64>() > p_novel;

        let (first, second) = if verify { (1, 0) } else { (0, 1) };
        let next = match self.store.sample_with_count_with(first, &mut self.rng)? {
            Some(id) => wrap(first, id),
            None => match self.store.sample_with_count_with(second, &mut self.rng)? {
                Some(id) => wrap(second, id),
                None => NextImage::Exhausted,
            },
        };
        debug!(done, unverified, p_novel, next = ?next, "picked next image");
        Ok(next)
    }

    /// Record a human's label for `id`, autosaving when due.
    pub fn record(&mut self, id: &str, label: Label) -> Result<LabelRecord, StoreError> {
        let record = self.store.vote(id, label)?;
        self.since_save += 1;
        if self.autosave_every > 0 && self.since_save >= self.autosave_every {
            self.save()?;
        }
        Ok(record)
    }

    /// Persist now and reset the autosave counter.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.persist()?;
        info!(recorded = self.since_save, "labeling session saved");
        self.since_save = 0;
        Ok(())
    }

    /// Labels recorded since the last save.
    pub fn pending(&self) -> u32 {
        self.since_save
    }
}

fn wrap(count: u32, id: ImageId) -> NextImage {
    if count == 0 {
        NextImage::Novel(id)
    } else {
        NextImage::Verify(id)
    }
}
