//! Engine configuration.
//!
//! Every tunable the heuristics depend on lives here rather than in code:
//! clustering tolerance, margin threshold, vocabularies, valid ranges.
//! Document-format variants are supported by swapping configuration, not
//! by adding branches.

/// Tunable thresholds and vocabularies for one extraction run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Vertical tolerance for clustering tokens into one line, in layout
    /// units. Tokens whose vertical centers differ by less than this
    /// belong to the same line.
    pub line_tolerance: f32,

    /// An anchor line must start at or left of this horizontal position.
    pub left_margin: f32,

    /// Digit count of a seat number. Lines starting with a numeric run of
    /// any other length never open a record.
    pub seat_length: usize,

    /// Maximum number of word tokens absorbed into a name, including
    /// continuation lines.
    pub name_token_cutoff: usize,

    /// Digit-count bounds for subject codes.
    pub subject_code_digits: (usize, usize),

    /// Valid range for grade-point averages. Candidates outside the range
    /// are rejected, not clamped.
    pub grade_point_range: (f32, f32),

    /// Vocabulary that disqualifies a numeric-prefixed line from being an
    /// anchor (course/table header keywords). Compared case-insensitively.
    pub anchor_stoplist: Vec<String>,

    /// Keywords stripped from names during assembly (status, gender and
    /// institution words accidentally captured). Compared case-insensitively.
    pub name_noise: Vec<String>,
}

impl EngineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line clustering tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the anchor left-margin threshold.
    pub fn with_left_margin(mut self, margin: f32) -> Self {
        self.left_margin = margin;
        self
    }

    /// Set the seat-number digit count.
    pub fn with_seat_length(mut self, length: usize) -> Self {
        self.seat_length = length;
        self
    }

    /// Set the name token cutoff.
    pub fn with_name_token_cutoff(mut self, cutoff: usize) -> Self {
        self.name_token_cutoff = cutoff;
        self
    }

    /// Set the subject-code digit bounds.
    pub fn with_subject_code_digits(mut self, min: usize, max: usize) -> Self {
        self.subject_code_digits = (min, max);
        self
    }

    /// Set the valid grade-point range.
    pub fn with_grade_point_range(mut self, min: f32, max: f32) -> Self {
        self.grade_point_range = (min, max);
        self
    }

    /// Add a word to the anchor stoplist.
    pub fn with_anchor_stopword(mut self, word: impl Into<String>) -> Self {
        self.anchor_stoplist.push(word.into());
        self
    }

    /// Add a word to the name noise vocabulary.
    pub fn with_name_noise_word(mut self, word: impl Into<String>) -> Self {
        self.name_noise.push(word.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 5.0,
            left_margin: 60.0,
            seat_length: 9,
            name_token_cutoff: 6,
            subject_code_digits: (4, 8),
            grade_point_range: (0.0, 10.0),
            anchor_stoplist: [
                "COURSE",
                "SUBJECT",
                "SEMESTER",
                "SCHEME",
                "COLLEGE",
                "CENTRE",
                "CENTER",
                "GAZETTE",
                "PAPER",
                "HELD IN",
                "PAGE",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            name_noise: [
                "REGULAR",
                "REPEATER",
                "EXTERNAL",
                "RPTR",
                "MALE",
                "FEMALE",
                "COLLEGE",
                "PASS",
                "FAIL",
                "ATKT",
                "ABSENT",
                "NULL",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
