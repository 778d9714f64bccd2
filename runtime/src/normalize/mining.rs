//! Best-effort metadata mining from screening descriptions.
//!
//! Each [`Rule`] looks at the description on its own and returns whatever it
//! found. [`mine`] applies [`RULES`] in order and, per field, keeps the last
//! value a rule produced. Reordering the table is how precedence changes.

use crate::model::VideoFormat;
use regex::Regex;
use std::sync::OnceLock;

/// Series name whose descriptions carry a `(year, format, NNm)` tag.
pub const MEZZANINE_MARKER: &str = "Mezzanine";

const DISCUSSION_MARKERS: [&str; 3] = ["Q&A", "In person:", "in person"];

/// What one rule, or the whole rule set, found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mined {
    pub director: Option<String>,
    pub year: Option<String>,
    pub duration: Option<u32>,
    pub video_format: Option<VideoFormat>,
}

impl Mined {
    /// Take every field `later` has set.
    fn overlay(&mut self, later: Mined) {
        if later.director.is_some() {
            self.director = later.director;
        }
        if later.year.is_some() {
            self.year = later.year;
        }
        if later.duration.is_some() {
            self.duration = later.duration;
        }
        if later.video_format.is_some() {
            self.video_format = later.video_format;
        }
    }
}

/// The text a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct MiningInput<'a> {
    pub description: &'a str,
    pub presented_by: &'a str,
}

/// A named extraction rule.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&MiningInput<'_>) -> Mined,
}

/// Rules in ascending precedence.
pub const RULES: &[Rule] = &[
    Rule {
        name: "format-baseline",
        apply: format_baseline,
    },
    Rule {
        name: "run-time-marker",
        apply: run_time_marker,
    },
    Rule {
        name: "single-director",
        apply: single_director,
    },
    Rule {
        name: "multi-director",
        apply: multi_director,
    },
    Rule {
        name: "dir-credit",
        apply: dir_credit,
    },
    Rule {
        name: "mezzanine-tag",
        apply: mezzanine_tag,
    },
];

/// Run every rule and merge, last non-absent value per field.
pub fn mine(input: &MiningInput<'_>) -> Mined {
    RULES.iter().fold(Mined::default(), |mut acc, rule| {
        acc.overlay((rule.apply)(input));
        acc
    })
}

/// Whether the description promises a Q&A or an in-person guest.
pub fn mentions_discussion(description: &str) -> bool {
    DISCUSSION_MARKERS.iter().any(|m| description.contains(m))
}

fn first_year(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?:19|20)\d{2}").expect("year regex is valid")
    });

    re.find(text).map(|m| m.as_str().to_string())
}

fn first_format(text: &str) -> Option<VideoFormat> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"DCP|70mm|35mm|16mm").expect("format regex is valid")
    });

    re.find(text).and_then(|m| VideoFormat::from_token(m.as_str()))
}

/// Any format token anywhere in the description.
fn format_baseline(input: &MiningInput<'_>) -> Mined {
    Mined {
        video_format: first_format(input.description),
        ..Default::default()
    }
}

/// `· 95' ·` style run time.
fn run_time_marker(input: &MiningInput<'_>) -> Mined {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"· (\d+)['’] ·").expect("run time regex is valid")
    });

    Mined {
        duration: re.captures(input.description).and_then(|c| c[1].parse().ok()),
        ..Default::default()
    }
}

/// `Director: Name ·` plus the first year in the description.
fn single_director(input: &MiningInput<'_>) -> Mined {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Director: ([^\n·]+?) ·").expect("director regex is valid")
    });

    if !input.description.contains("Director: ") {
        return Mined::default();
    }
    Mined {
        director: re
            .captures(input.description)
            .map(|c| c[1].trim().to_string())
            .filter(|d| !d.is_empty()),
        year: first_year(input.description),
        ..Default::default()
    }
}

/// `Directors: A and B ·`, conjunction rendered as `&amp;`.
fn multi_director(input: &MiningInput<'_>) -> Mined {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Directors: ([^\n·]+?) ·").expect("directors regex is valid")
    });

    if !input.description.contains("Directors: ") {
        return Mined::default();
    }
    Mined {
        director: re
            .captures(input.description)
            .map(|c| c[1].trim().replace(" and ", " &amp; "))
            .filter(|d| !d.is_empty()),
        year: first_year(input.description),
        ..Default::default()
    }
}

/// `(Dir. Name, YYYY)`; the last credit in the description wins.
fn dir_credit(input: &MiningInput<'_>) -> Mined {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\(Dir\. ([\p{L}\p{M}\s.'’-]+), (\d{4})\)").expect("credit regex is valid")
    });

    match re.captures_iter(input.description).last() {
        Some(c) => Mined {
            director: Some(c[1].trim().to_string()),
            year: Some(c[2].to_string()),
            ..Default::default()
        },
        None => Mined::default(),
    }
}

/// Mezzanine descriptions open with `(1971, 35mm, 102m)`.
fn mezzanine_tag(input: &MiningInput<'_>) -> Mined {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\b(\d{2,})m\b").expect("minutes regex is valid")
    });

    if !input.presented_by.contains(MEZZANINE_MARKER) {
        return Mined::default();
    }
    let Some(tag) = first_parenthetical(input.description) else {
        return Mined::default();
    };
    Mined {
        year: first_year(tag),
        video_format: first_format(tag),
        duration: re.captures(tag).and_then(|c| c[1].parse().ok()),
        ..Default::default()
    }
}

/// Text between the first `(` and the `)` after it.
fn first_parenthetical(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let rest = &text[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_desc(description: &str) -> Mined {
        mine(&MiningInput {
            description,
            presented_by: "Zebulon",
        })
    }

    #[test]
    fn test_single_director_with_year() {
        let m = mine_desc("A tender portrait. Director: Kelly Reichardt · USA · 2006 · 76' · DCP");
        assert_eq!(m.director.as_deref(), Some("Kelly Reichardt"));
        assert_eq!(m.year.as_deref(), Some("2006"));
        assert_eq!(m.duration, Some(76));
        assert_eq!(m.video_format, Some(VideoFormat::Dcp));
    }

    #[test]
    fn test_director_without_delimiter_keeps_year() {
        let m = mine_desc("Restored in 2019. Director: Someone");
        assert_eq!(m.director, None);
        assert_eq!(m.year.as_deref(), Some("2019"));
    }

    #[test]
    fn test_multi_director_conjunction() {
        let m = mine_desc("Directors: Jean-Marie Straub and Danièle Huillet · 1975 · 16mm");
        assert_eq!(
            m.director.as_deref(),
            Some("Jean-Marie Straub &amp; Danièle Huillet")
        );
        assert_eq!(m.year.as_deref(), Some("1975"));
        assert_eq!(m.video_format, Some(VideoFormat::Mm16));
    }

    #[test]
    fn test_dir_credit_beats_director_line() {
        let m = mine_desc("Director: X · (1990) · paired with (Dir. Y, 1995)");
        assert_eq!(m.director.as_deref(), Some("Y"));
        assert_eq!(m.year.as_deref(), Some("1995"));
    }

    #[test]
    fn test_dir_credit_accepts_accented_names() {
        let m = mine_desc("Paris, summer solstice. (Dir. Agnès Varda, 1962)");
        assert_eq!(m.director.as_deref(), Some("Agnès Varda"));
        assert_eq!(m.year.as_deref(), Some("1962"));
    }

    #[test]
    fn test_last_dir_credit_wins() {
        let m = mine_desc("(Dir. Chantal Akerman, 1975) then (Dir. Claire Denis, 1999)");
        assert_eq!(m.director.as_deref(), Some("Claire Denis"));
        assert_eq!(m.year.as_deref(), Some("1999"));
    }

    #[test]
    fn test_mezzanine_tag_overrides_format_year_duration() {
        let m = mine(&MiningInput {
            description: "(1971, 35mm, 102m) Director: Monte Hellman · 1970 · 90' · DCP",
            presented_by: "Cinema Mezzanine",
        });
        assert_eq!(m.year.as_deref(), Some("1971"));
        assert_eq!(m.video_format, Some(VideoFormat::Mm35));
        assert_eq!(m.duration, Some(102));
        assert_eq!(m.director.as_deref(), Some("Monte Hellman"));
    }

    #[test]
    fn test_mezzanine_duration_ignores_gauge() {
        let m = mine(&MiningInput {
            description: "(1984, 16mm) A lost print.",
            presented_by: "Mezzanine",
        });
        assert_eq!(m.video_format, Some(VideoFormat::Mm16));
        assert_eq!(m.duration, None);
    }

    #[test]
    fn test_mezzanine_rule_needs_series_marker() {
        let m = mine_desc("(1971, 35mm, 102m)");
        assert_eq!(m.duration, None);
        assert_eq!(m.year, None);
        // the format baseline still sees the token
        assert_eq!(m.video_format, Some(VideoFormat::Mm35));
    }

    #[test]
    fn test_nothing_found_leaves_fields_unset() {
        assert_eq!(mine_desc("An evening of surprises."), Mined::default());
    }

    #[test]
    fn test_rule_order_is_documented_precedence() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "format-baseline",
                "run-time-marker",
                "single-director",
                "multi-director",
                "dir-credit",
                "mezzanine-tag"
            ]
        );
    }

    #[test]
    fn test_patterns_compile_once_and_stay_stable() {
        let input = MiningInput {
            description: "(1971, 35mm, 102m) · 99' · (Dir. Agnès Varda, 1962)",
            presented_by: "Mezzanine",
        };
        let first = mine(&input);
        assert_eq!(first, mine(&input));
        assert_eq!(first.director.as_deref(), Some("Agnès Varda"));
        assert_eq!(first.duration, Some(102));
    }

    #[test]
    fn test_mentions_discussion() {
        assert!(mentions_discussion("Followed by a Q&A with the director"));
        assert!(mentions_discussion("In person: Miranda July"));
        assert!(mentions_discussion("with the filmmaker in person"));
        assert!(!mentions_discussion("Personal favourites from the archive"));
    }
}
