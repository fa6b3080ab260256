use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Result, TypteaError};
use crate::language::{LanguageProvider, WeightedWordSource};
use crate::layout::{self, CHARS_PER_LINE, LINES_PER_VIEW};
use crate::stats;
use crate::time_series::WpmSeries;

pub const MIN_DURATION_SECS: u64 = 10;
pub const MAX_DURATION_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_secs: u64,
    pub language: String,
    pub lines_per_view: usize,
    pub chars_per_line: usize,
    pub initial_words: usize,
    /// Refill the buffer when fewer unconsumed words than this remain.
    pub lookahead: usize,
    pub batch_size: usize,
}

impl SessionConfig {
    pub fn new(duration_secs: u64, language: impl Into<String>) -> Self {
        Self {
            duration_secs,
            language: language.into(),
            lines_per_view: LINES_PER_VIEW,
            chars_per_line: CHARS_PER_LINE,
            initial_words: 200,
            lookahead: 50,
            batch_size: 100,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.duration_secs) {
            return Err(TypteaError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
}

/// How the renderer should draw one character of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Typed,
    Mistyped,
    Current,
    Pending,
}

/// A timed typing run over an endless, scrolling stream of words.
///
/// Only the first display line is typed against. `cursor_pos` counts code
/// points into that line; reaching its end waits for a space, which scrolls
/// the next line up. `global_pos` counts every judged character since the
/// start and keys the error marks.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    source: WeightedWordSource,
    word_buffer: Vec<String>,
    words_consumed: usize,
    display_lines: Vec<String>,
    cursor_pos: usize,
    global_pos: usize,
    errors: HashSet<usize>,
    total_errors_made: usize,
    typed: String,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    wpm_series: WpmSeries,
}

impl Session {
    /// Validate `config`, then draw words for its language from `provider`.
    ///
    /// The language must be one the provider lists; a listed language that
    /// fails to load falls back to the ranked default.
    pub fn new<P>(config: SessionConfig, provider: &mut P) -> Result<Self>
    where
        P: LanguageProvider + ?Sized,
    {
        config.validate()?;
        if !provider.is_available(&config.language) {
            return Err(TypteaError::UnknownLanguage {
                code: config.language.clone(),
                available: provider.list_available(),
            });
        }
        let source = WeightedWordSource::from_provider(provider, &config.language)?;
        Ok(Self::build(config, source))
    }

    /// Build around an existing word source, e.g. a seeded one.
    pub fn with_source(config: SessionConfig, source: WeightedWordSource) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, source))
    }

    fn build(config: SessionConfig, mut source: WeightedWordSource) -> Self {
        let word_buffer = source.sample(config.initial_words);
        let mut session = Self {
            config,
            source,
            word_buffer,
            words_consumed: 0,
            display_lines: Vec::new(),
            cursor_pos: 0,
            global_pos: 0,
            errors: HashSet::new(),
            total_errors_made: 0,
            typed: String::new(),
            started_at: None,
            finished_at: None,
            wpm_series: WpmSeries::new(),
        };
        session.replenish();
        session.repack();
        session
    }

    /// Start over with fresh words, keeping duration and language.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let source = self.source.clone();
        *self = Self::build(config, source);
        debug!(language = self.language(), "session reset");
    }

    pub fn add_character(&mut self, ch: char) {
        self.add_character_at(ch, Instant::now());
    }

    /// Judge one keystroke made at `now`.
    pub fn add_character_at(&mut self, ch: char, now: Instant) {
        if self.finished_at.is_some() {
            return;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
            info!(
                language = self.language(),
                duration_secs = self.config.duration_secs,
                "session started"
            );
        }
        if self.is_time_up_at(now) {
            self.finish(now);
            return;
        }

        let expected = self
            .display_lines
            .first()
            .and_then(|line| line.chars().nth(self.cursor_pos));
        match expected {
            None => {
                if ch == ' ' {
                    self.typed.push(ch);
                    self.global_pos += 1;
                    self.scroll();
                }
            }
            Some(expected) => {
                if ch != expected {
                    self.errors.insert(self.global_pos);
                    self.total_errors_made += 1;
                }
                self.typed.push(ch);
                self.cursor_pos += 1;
                self.global_pos += 1;
            }
        }
    }

    /// Undo the last keystroke on the current line. Never crosses back into
    /// a line that has scrolled away.
    pub fn remove_character(&mut self) {
        self.remove_character_at(Instant::now());
    }

    pub fn remove_character_at(&mut self, now: Instant) {
        if self.finished_at.is_some() {
            return;
        }
        if self.is_time_up_at(now) {
            self.finish(now);
            return;
        }
        if self.cursor_pos == 0 || self.typed.is_empty() {
            return;
        }
        self.typed.pop();
        self.cursor_pos -= 1;
        self.global_pos -= 1;
        self.errors.remove(&self.global_pos);
    }

    pub fn tick(&mut self) -> Phase {
        self.tick_at(Instant::now())
    }

    /// Periodic timer hook: finishes an expired session and samples WPM
    /// once per whole second while running.
    pub fn tick_at(&mut self, now: Instant) -> Phase {
        if self.phase() == Phase::Running {
            if self.is_time_up_at(now) {
                self.finish(now);
            } else {
                let secs = self.elapsed_at(now).as_secs_f64();
                let wpm = stats::compute_stats_at(self, now).wpm;
                self.wpm_series.record_whole_second(secs, wpm);
            }
        }
        self.phase()
    }

    pub fn is_time_up(&self) -> bool {
        self.is_time_up_at(Instant::now())
    }

    pub fn is_time_up_at(&self, now: Instant) -> bool {
        match self.started_at {
            None => false,
            Some(_) if self.finished_at.is_some() => true,
            Some(start) => now.saturating_duration_since(start) >= self.config.duration(),
        }
    }

    pub fn remaining_time(&self) -> Duration {
        self.remaining_time_at(Instant::now())
    }

    pub fn remaining_time_at(&self, now: Instant) -> Duration {
        self.config
            .duration()
            .saturating_sub(self.elapsed_at(now))
    }

    /// Time since the first keystroke. Frozen at the configured duration
    /// once the session has finished.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.started_at, self.finished_at) {
            (None, _) => Duration::ZERO,
            (Some(start), Some(end)) => end
                .saturating_duration_since(start)
                .min(self.config.duration()),
            (Some(start), None) => now.saturating_duration_since(start),
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at, self.finished_at) {
            (None, _) => Phase::NotStarted,
            (Some(_), None) => Phase::Running,
            (Some(_), Some(_)) => Phase::Finished,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Code of the word bank actually in use, after any fallback.
    pub fn language(&self) -> &str {
        self.source.language()
    }

    pub fn display_lines(&self) -> &[String] {
        &self.display_lines
    }

    /// All display lines run together, as counted for `total_chars`.
    pub fn display_text(&self) -> String {
        self.display_lines.concat()
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn global_pos(&self) -> usize {
        self.global_pos
    }

    pub fn error_set(&self) -> &HashSet<usize> {
        &self.errors
    }

    pub fn is_error_at(&self, global: usize) -> bool {
        self.errors.contains(&global)
    }

    pub fn total_errors_made(&self) -> usize {
        self.total_errors_made
    }

    pub fn typed_input(&self) -> &str {
        &self.typed
    }

    pub fn words_consumed(&self) -> usize {
        self.words_consumed
    }

    pub fn word_buffer(&self) -> &[String] {
        &self.word_buffer
    }

    pub fn wpm_series(&self) -> &WpmSeries {
        &self.wpm_series
    }

    /// Rendering state of the character at `col` (code points) on display
    /// line `line`.
    pub fn char_state(&self, line: usize, col: usize) -> CharState {
        if line > 0 || col > self.cursor_pos {
            return CharState::Pending;
        }
        if col == self.cursor_pos {
            return CharState::Current;
        }
        let global = self.global_pos - (self.cursor_pos - col);
        if self.is_error_at(global) {
            CharState::Mistyped
        } else {
            CharState::Typed
        }
    }

    fn finish(&mut self, now: Instant) {
        self.finished_at = Some(now);
        let final_stats = stats::compute_stats_at(self, now);
        self.wpm_series
            .record_final(final_stats.elapsed.as_secs_f64(), final_stats.wpm);
        info!(
            wpm = final_stats.wpm,
            accuracy = final_stats.accuracy,
            chars = final_stats.chars_typed,
            "session finished"
        );
    }

    fn scroll(&mut self) {
        self.words_consumed += self
            .display_lines
            .first()
            .map_or(0, |line| layout::word_count(line));
        self.cursor_pos = 0;
        self.replenish();
        self.repack();
        debug!(
            words_consumed = self.words_consumed,
            buffered = self.word_buffer.len(),
            "scrolled"
        );
    }

    fn replenish(&mut self) {
        let batch = self.config.batch_size.max(1);
        while self.word_buffer.len() - self.words_consumed < self.config.lookahead {
            let more = self.source.sample(batch);
            self.word_buffer.extend(more);
            debug!(buffered = self.word_buffer.len(), "word buffer extended");
        }
    }

    fn repack(&mut self) {
        self.display_lines = layout::pack(
            self.word_buffer.as_slice(),
            self.words_consumed,
            self.config.lines_per_view,
            self.config.chars_per_line,
        )
        .lines;
    }
}
