//! LRC lyric text parsing shared by the song sources.

use super::LyricsLine;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TIMESTAMP_RE: Regex = Regex::new(r"\[(\d{2}):(\d{2})(?:\.(\d{2,3}))?\]").unwrap();
    /// Production-credit lines that are not lyrics.
    static ref CREDIT_RE: Regex = Regex::new(
        r"(?i)(produced by|arranged by|conducted by|recorded at|engineered by|mixed by|mastered by|strings arranged by|vocals recorded at|piano recorded at|guitar recorded at|bass recorded at|drums recorded at|music publishing|ltd)"
    )
    .unwrap();
}

/// Parse `[mm:ss.xx]`-stamped LRC text. Lines without a stamp get a
/// `None` timestamp; blank lines are dropped.
pub fn parse_lrc(raw: &str) -> Vec<LyricsLine> {
    raw.lines()
        .filter_map(|line| {
            let timestamp = TIMESTAMP_RE.captures(line).and_then(parse_timestamp);
            let text = TIMESTAMP_RE.replace_all(line, "").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(LyricsLine { text, timestamp })
        })
        .collect()
}

/// Parse unsynchronized lyrics, one line of text per lyric line.
pub fn parse_plain(raw: &str) -> Vec<LyricsLine> {
    raw.lines()
        .filter_map(|line| {
            let text = line.trim();
            if text.is_empty() {
                return None;
            }
            Some(LyricsLine {
                text: text.to_string(),
                timestamp: None,
            })
        })
        .collect()
}

fn parse_timestamp(caps: regex::Captures) -> Option<f64> {
    let minutes: f64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(2)?.as_str().parse().ok()?;
    let fraction = match caps.get(3) {
        Some(frac) => {
            let value: f64 = frac.as_str().parse().ok()?;
            // Two digits are centiseconds, three are milliseconds.
            if frac.as_str().len() == 2 {
                value / 100.0
            } else {
                value / 1000.0
            }
        }
        None => 0.0,
    };
    Some(minutes * 60.0 + seconds + fraction)
}

/// Lines naming writers, studios, or labels rather than lyrics. The
/// colon check catches the `作词: …` style metadata headers common in
/// LRC files.
pub fn is_metadata_or_credit(text: &str) -> bool {
    text.contains('：') || text.contains(':') || CREDIT_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_parse_to_seconds() {
        let lines = parse_lrc("[01:23.45]月亮代表我的心\n[02:05.500]你问我爱你有多深");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "月亮代表我的心");
        assert!((lines[0].timestamp.unwrap() - 83.45).abs() < 1e-9);
        assert!((lines[1].timestamp.unwrap() - 125.5).abs() < 1e-9);
    }

    #[test]
    fn unstamped_lines_have_no_timestamp() {
        let lines = parse_lrc("just a line");
        assert_eq!(lines[0].timestamp, None);
    }

    #[test]
    fn blank_and_stamp_only_lines_are_dropped() {
        let lines = parse_lrc("[00:01.00]\n\n[00:02.00]hello");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hello");
    }

    #[test]
    fn plain_lyrics_split_on_newlines() {
        let lines = parse_plain("line one\n\nline two\n");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.timestamp.is_none()));
    }

    #[test]
    fn credit_and_metadata_lines_are_flagged() {
        assert!(is_metadata_or_credit("作词: 孙仪"));
        assert!(is_metadata_or_credit("Produced by Someone"));
        assert!(is_metadata_or_credit("Mixed by an engineer"));
        assert!(!is_metadata_or_credit("月亮代表我的心"));
    }
}
