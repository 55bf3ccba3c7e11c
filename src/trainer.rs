use crate::compare::CharState;
use crate::corpus::{Corpus, Level, Selection};
use crate::error::UNSUPPORTED_SELECTION_MESSAGE;
use crate::metrics::SessionResult;
use crate::paragraph::select_paragraph;
use crate::session::{Phase, TypingSession};
use crate::store::{persist_selection, restore_selection, SessionStore};
use crate::timer::{TickScheduler, TimerId};
use rand::RngCore;
use std::time::Instant;
use tracing::{info, warn};

/// Owns everything one trainer window needs: the corpus, the persisted
/// selection, the random source and the current round.
pub struct Trainer {
    corpus: Corpus,
    store: Box<dyn SessionStore>,
    rng: Box<dyn RngCore + Send>,
    selection: Selection,
    session: TypingSession,
    error: Option<&'static str>,
}

impl Trainer {
    /// Restore the persisted selection (or use `fallback`) and load a paragraph for it
    pub fn new(
        corpus: Corpus,
        store: Box<dyn SessionStore>,
        rng: Box<dyn RngCore + Send>,
        scheduler: Box<dyn TickScheduler>,
        fallback: Selection,
    ) -> Self {
        let selection = restore_selection(store.as_ref()).unwrap_or(fallback);
        let mut trainer = Self {
            corpus,
            store,
            rng,
            selection: selection.clone(),
            session: TypingSession::unloaded(scheduler),
            error: None,
        };
        trainer.select(selection);
        trainer
    }

    /// Switch to `selection` and start a new round on a fresh paragraph.
    ///
    /// Returns false when the corpus has nothing for it; the error message is
    /// then shown, input is disabled and the stored selection is left alone.
    pub fn select(&mut self, selection: Selection) -> bool {
        self.selection = selection;

        match select_paragraph(&self.corpus, &self.selection, &mut *self.rng) {
            Ok(text) => {
                if let Err(err) = persist_selection(self.store.as_mut(), &self.selection) {
                    warn!(%err, "could not persist selection");
                }
                info!(
                    language = %self.selection.language,
                    level = %self.selection.level,
                    "paragraph selected"
                );
                self.error = None;
                self.session.load(text);
                true
            }
            Err(err) => {
                warn!(%err, "selection unsupported");
                self.error = Some(UNSUPPORTED_SELECTION_MESSAGE);
                self.session.unload();
                false
            }
        }
    }

    pub fn change_language(&mut self, language: &str) -> bool {
        self.select(Selection::new(language, self.selection.level))
    }

    pub fn change_level(&mut self, level: Level) -> bool {
        self.select(Selection::new(self.selection.language.clone(), level))
    }

    /// Move to the next (or previous) language known to the corpus
    pub fn cycle_language(&mut self, forward: bool) -> bool {
        let languages = self.corpus.languages();
        if languages.is_empty() {
            return self.next_paragraph();
        }

        let idx = languages
            .iter()
            .position(|l| *l == self.selection.language);
        let next = match (idx, forward) {
            (Some(i), true) => (i + 1) % languages.len(),
            (Some(i), false) => (i + languages.len() - 1) % languages.len(),
            (None, _) => 0,
        };
        self.change_language(&languages[next])
    }

    pub fn cycle_level(&mut self, forward: bool) -> bool {
        let level = if forward {
            self.selection.level.next()
        } else {
            self.selection.level.prev()
        };
        self.change_level(level)
    }

    /// New paragraph for the current selection
    pub fn next_paragraph(&mut self) -> bool {
        self.select(self.selection.clone())
    }

    /// Same paragraph, fresh round
    pub fn try_again(&mut self) {
        self.session.reset();
    }

    pub fn type_char(&mut self, c: char, now: Instant) -> bool {
        self.session.type_char(c, now)
    }

    pub fn backspace(&mut self, now: Instant) -> bool {
        self.session.backspace(now)
    }

    pub fn paste(&mut self, clipboard: &str, now: Instant) -> bool {
        self.session.paste(clipboard, now)
    }

    pub fn copy_reference(&self) -> &'static str {
        self.session.copy_reference()
    }

    pub fn on_tick(&mut self, id: TimerId) -> bool {
        self.session.on_tick(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    /// User-facing message when no paragraph could be selected
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn states(&self) -> &[CharState] {
        self.session.states()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.session.result()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn input_enabled(&self) -> bool {
        self.session.input_enabled()
    }

    pub fn clock(&self) -> String {
        self.session.clock()
    }
}
