use std::time::{Duration, Instant};

use crate::session::Session;

/// Standard word length for WPM purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Snapshot of a session's performance.
///
/// `accuracy` counts every mistake ever made, including ones later erased
/// with backspace, while `uncorrected_errors` (and so net `wpm`) only counts
/// mistakes still standing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypingStats {
    /// Net words per minute.
    pub wpm: f64,
    pub gross_wpm: f64,
    pub accuracy: f64,
    pub chars_typed: usize,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub elapsed: Duration,
    pub complete: bool,
    pub uncorrected_errors: usize,
    pub total_errors: usize,
}

pub fn compute_stats(session: &Session) -> TypingStats {
    compute_stats_at(session, Instant::now())
}

pub fn compute_stats_at(session: &Session, now: Instant) -> TypingStats {
    if !session.is_started() {
        return TypingStats::default();
    }

    let elapsed = session.elapsed_at(now);
    let minutes = elapsed.as_secs_f64() / 60.0;
    let chars_typed = session.global_pos();
    let uncorrected_errors = session.error_set().len();
    let total_errors = session.total_errors_made();

    let (gross_wpm, wpm) = if minutes > 0.0 {
        let gross = chars_typed as f64 / CHARS_PER_WORD / minutes;
        (gross, (gross - uncorrected_errors as f64 / minutes).max(0.0))
    } else {
        (0.0, 0.0)
    };

    // Erased mistakes still count, so errors can outnumber typed characters.
    let correct_chars = chars_typed.saturating_sub(total_errors);
    let accuracy = if chars_typed > 0 {
        (correct_chars as f64 / chars_typed as f64 * 100.0).max(0.0)
    } else {
        0.0
    };

    TypingStats {
        wpm,
        gross_wpm,
        accuracy,
        chars_typed,
        correct_chars,
        total_chars: session.display_text().chars().count(),
        elapsed,
        complete: session.is_finished(),
        uncorrected_errors,
        total_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{WeightedWordSource, WordBank};
    use crate::session::SessionConfig;

    fn session(word: &str) -> Session {
        let bank = WordBank::new("xx", "test", vec![word.to_string()]).unwrap();
        let mut config = SessionConfig::new(60, "xx");
        config.chars_per_line = 10;
        Session::with_source(config, WeightedWordSource::new(bank).with_seed(9)).unwrap()
    }

    fn type_at(session: &mut Session, s: &str, now: Instant) {
        for c in s.chars() {
            session.add_character_at(c, now);
        }
    }

    #[test]
    fn test_not_started_is_all_zero() {
        let s = session("abcd");
        assert_eq!(compute_stats(&s), TypingStats::default());
    }

    #[test]
    fn test_zero_elapsed_has_no_division() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        type_at(&mut s, "ab", t0);

        let stats = compute_stats_at(&s, t0);
        assert_eq!(stats.wpm, 0.0);
        assert_eq!(stats.gross_wpm, 0.0);
        assert_eq!(stats.chars_typed, 2);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn test_wpm_over_one_minute() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        // "abcd abcd" fills the line, then a space scrolls
        for _ in 0..5 {
            type_at(&mut s, "abcd abcd ", t0);
        }
        let stats = compute_stats_at(&s, t0 + Duration::from_secs(60));
        assert_eq!(stats.chars_typed, 50);
        assert_eq!(stats.gross_wpm, 10.0);
        assert_eq!(stats.wpm, 10.0);
        assert_eq!(stats.accuracy, 100.0);
        assert!(!stats.complete);
    }

    #[test]
    fn test_uncorrected_errors_reduce_net_wpm() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        type_at(&mut s, "abXY abcd ", t0);

        let stats = compute_stats_at(&s, t0 + Duration::from_secs(30));
        assert_eq!(stats.uncorrected_errors, 2);
        // 10 chars in half a minute is 4 gross wpm, less 2 errors / 0.5 min
        assert_eq!(stats.gross_wpm, 4.0);
        assert_eq!(stats.wpm, 0.0);
        assert_eq!(stats.correct_chars, 8);
        assert_eq!(stats.accuracy, 80.0);
    }

    #[test]
    fn test_corrected_errors_still_cost_accuracy() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        type_at(&mut s, "abX", t0);
        s.remove_character();
        type_at(&mut s, "cd", t0);

        let stats = compute_stats_at(&s, t0 + Duration::from_secs(6));
        assert_eq!(stats.chars_typed, 4);
        assert_eq!(stats.uncorrected_errors, 0);
        assert_eq!(stats.total_errors, 1);
        assert_eq!(stats.correct_chars, 3);
        assert_eq!(stats.accuracy, 75.0);
        // 4 chars over a tenth of a minute
        assert!((stats.wpm - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_floors_at_zero() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        for _ in 0..3 {
            s.add_character_at('X', t0);
            s.remove_character();
        }
        s.add_character_at('a', t0);

        let stats = compute_stats_at(&s, t0 + Duration::from_secs(1));
        assert_eq!(stats.chars_typed, 1);
        assert_eq!(stats.total_errors, 3);
        assert_eq!(stats.correct_chars, 0);
        assert_eq!(stats.accuracy, 0.0);
    }

    #[test]
    fn test_complete_after_finish() {
        let mut s = session("abcd");
        let t0 = Instant::now();
        type_at(&mut s, "abcd", t0);
        s.tick_at(t0 + Duration::from_secs(61));

        let stats = compute_stats_at(&s, t0 + Duration::from_secs(300));
        assert!(stats.complete);
        assert_eq!(stats.elapsed, Duration::from_secs(60));
        assert_eq!(stats.gross_wpm, 0.8);
    }

    #[test]
    fn test_total_chars_counts_view() {
        let mut s = session("abcd");
        s.add_character_at('a', Instant::now());
        // three lines of "abcd abcd"
        let stats = compute_stats(&s);
        assert_eq!(stats.total_chars, 27);
    }
}
