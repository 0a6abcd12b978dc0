//! Question records: the shared content unit with engagement counters.

use serde::{Deserialize, Serialize};

use super::{now_micros, require_text, QuestionId, ViewerId, MAX_LABEL_SIZE, MAX_TEXT_SIZE};
use crate::types::error::{QnaError, QnaResult};

/// The kind of interview a question was asked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    SystemDesign,
    Coding,
    CaseStudy,
}

impl InterviewType {
    /// Return the canonical name for this interview type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::SystemDesign => "system-design",
            Self::Coding => "coding",
            Self::CaseStudy => "case-study",
        }
    }

    /// Parse an interview type from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "technical" => Some(Self::Technical),
            "behavioral" => Some(Self::Behavioral),
            "system-design" => Some(Self::SystemDesign),
            "coding" => Some(Self::Coding),
            "case-study" => Some(Self::CaseStudy),
            _ => None,
        }
    }
}

impl std::fmt::Display for InterviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for InterviewType {
    type Err = QnaError;

    fn from_str(s: &str) -> QnaResult<Self> {
        Self::from_name(s)
            .ok_or_else(|| QnaError::Validation(format!("unknown interview type: {s}")))
    }
}

/// How hard the question is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Return the canonical name for this difficulty.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse a difficulty from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = QnaError;

    fn from_str(s: &str) -> QnaResult<Self> {
        Self::from_name(s).ok_or_else(|| QnaError::Validation(format!("unknown difficulty: {s}")))
    }
}

/// A community answer appended to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Viewer who wrote the answer.
    pub author: ViewerId,
    /// Answer text.
    pub text: String,
    /// When the answer was written (Unix epoch microseconds).
    pub created_at: u64,
}

/// A shared question record.
///
/// Holds no viewer-specific state: per-viewer vote direction and bookmark
/// flags live on [`Viewer`](super::Viewer) and are merged in by the
/// projector at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (assigned sequentially by the store).
    pub id: QuestionId,
    /// Viewer who posted the question.
    pub author: ViewerId,
    /// Question text.
    pub question: String,
    /// Reference answer text.
    pub answer: String,
    /// Company the question was asked at.
    pub company: String,
    /// Kind of interview.
    pub interview_type: InterviewType,
    /// Free-text category label.
    pub category: String,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Aggregate vote counter. May go negative.
    pub votes: i64,
    /// View counter. Never decreases.
    pub views: u64,
    /// When the question was posted (Unix epoch microseconds).
    pub created_at: u64,
    /// When the question was last edited (Unix epoch microseconds).
    pub updated_at: u64,
    /// Community answers, oldest first.
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// Store-managed record version for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
}

impl Question {
    /// Validate the editable text fields.
    pub fn validate(&self) -> QnaResult<()> {
        require_text("question", &self.question, MAX_TEXT_SIZE)?;
        require_text("answer", &self.answer, MAX_TEXT_SIZE)?;
        require_text("company", &self.company, MAX_LABEL_SIZE)?;
        require_text("category", &self.category, MAX_LABEL_SIZE)?;
        Ok(())
    }

    /// Case-insensitive substring match against the question text.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty() || self.question.to_lowercase().contains(needle)
    }
}

/// Builder for constructing Question instances ergonomically.
pub struct QuestionBuilder {
    author: ViewerId,
    question: String,
    answer: String,
    company: String,
    interview_type: InterviewType,
    category: String,
    difficulty: Difficulty,
    created_at: Option<u64>,
}

impl QuestionBuilder {
    /// Create a new builder with the required texts.
    pub fn new(author: ViewerId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            author,
            question: question.into(),
            answer: answer.into(),
            company: String::new(),
            interview_type: InterviewType::Technical,
            category: String::new(),
            difficulty: Difficulty::Medium,
            created_at: None,
        }
    }

    /// Set the company.
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Set the category label.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the interview type.
    pub fn interview_type(mut self, interview_type: InterviewType) -> Self {
        self.interview_type = interview_type;
        self
    }

    /// Set the difficulty.
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: u64) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Build the Question. The id will be 0 (assigned by the store on insertion).
    pub fn build(self) -> Question {
        let now = self.created_at.unwrap_or_else(now_micros);
        Question {
            id: 0,
            author: self.author,
            question: self.question.trim().to_string(),
            answer: self.answer.trim().to_string(),
            company: self.company.trim().to_string(),
            interview_type: self.interview_type,
            category: self.category.trim().to_string(),
            difficulty: self.difficulty,
            votes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
            answers: Vec::new(),
            version: 0,
        }
    }
}

/// Owner edit of a question. Covers editorial fields only; counters are
/// not reachable through a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub company: Option<String>,
    pub interview_type: Option<InterviewType>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.answer.is_none()
            && self.company.is_none()
            && self.interview_type.is_none()
            && self.category.is_none()
            && self.difficulty.is_none()
    }

    /// Apply the patch to a question, validating every replaced field.
    pub fn apply(&self, target: &mut Question) -> QnaResult<()> {
        if let Some(text) = &self.question {
            target.question = require_text("question", text, MAX_TEXT_SIZE)?;
        }
        if let Some(text) = &self.answer {
            target.answer = require_text("answer", text, MAX_TEXT_SIZE)?;
        }
        if let Some(company) = &self.company {
            target.company = require_text("company", company, MAX_LABEL_SIZE)?;
        }
        if let Some(category) = &self.category {
            target.category = require_text("category", category, MAX_LABEL_SIZE)?;
        }
        if let Some(interview_type) = self.interview_type {
            target.interview_type = interview_type;
        }
        if let Some(difficulty) = self.difficulty {
            target.difficulty = difficulty;
        }
        target.updated_at = now_micros();
        Ok(())
    }
}
