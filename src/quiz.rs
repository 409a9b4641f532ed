//! Quiz generation and grading flow

use crate::api::Backend;
use crate::error::{ClientError, Result};
use crate::types::{
    Answers, DocumentId, GenerateQuizRequest, GenerateQuizResponse, OptionLetter, Quiz,
    QuizAttemptSummary, QuizQuestion, QuizResult, UserId, ValidateQuizRequest,
};

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const QUESTION_COUNT_HINT: (u32, u32) = (1, 20);

pub const NO_DOCUMENT_MESSAGE: &str = "Select a document first";

/// Where the quiz view is
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuizFlow {
    /// Picking a document and a question count
    #[default]
    Selecting,
    Answering { quiz: Quiz, answers: Answers },
    Graded { quiz: Quiz, result: QuizResult },
    /// The backend's quiz had no usable question list
    Malformed,
}

impl QuizFlow {
    pub fn start(quiz: Quiz) -> Self {
        QuizFlow::Answering {
            quiz,
            answers: Answers::new(),
        }
    }

    /// Record the answer for a 1-based question number; a later pick replaces an earlier one.
    pub fn record_answer(&mut self, question_no: u32, letter: OptionLetter) {
        if let QuizFlow::Answering { answers, .. } = self {
            answers.insert(question_no, letter);
        }
    }

    pub fn answer(&self, question_no: u32) -> Option<OptionLetter> {
        match self {
            QuizFlow::Answering { answers, .. } => answers.get(&question_no).copied(),
            _ => None,
        }
    }

    pub fn graded(self, result: QuizResult) -> Self {
        match self {
            QuizFlow::Answering { quiz, .. } | QuizFlow::Graded { quiz, .. } => {
                QuizFlow::Graded { quiz, result }
            }
            other => other,
        }
    }

    /// "Generate more": drop quiz, answers and result.
    pub fn reset() -> Self {
        QuizFlow::Selecting
    }
}

/// Parse the question-count field. The 1-20 range is only a hint.
pub fn parse_question_count(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClientError::Validation(
            "Number of questions must be a positive whole number".to_string(),
        )),
    }
}

/// Turn the generation payload into a quiz, or `Malformed` when the
/// question list is missing or not a list of questions.
pub fn quiz_from_response(resp: GenerateQuizResponse) -> Result<QuizFlow> {
    if !resp.status {
        return Err(ClientError::rejected(resp.message, "Failed to generate quiz"));
    }
    let quiz_id = resp
        .quiz_id
        .ok_or_else(|| ClientError::Decode("quiz response has no quiz_id".to_string()))?;

    let questions = resp
        .quiz
        .and_then(|mut quiz| quiz.get_mut("questions").map(serde_json::Value::take))
        .filter(serde_json::Value::is_array)
        .and_then(|v| serde_json::from_value::<Vec<QuizQuestion>>(v).ok());

    Ok(match questions {
        Some(questions) => QuizFlow::start(Quiz { quiz_id, questions }),
        None => {
            tracing::warn!("Quiz {} arrived without a valid question list", quiz_id);
            QuizFlow::Malformed
        }
    })
}

/// Ask the backend for a new quiz on a document.
pub async fn generate(
    backend: &dyn Backend,
    user_id: UserId,
    document_id: Option<DocumentId>,
    num_questions: u32,
) -> Result<QuizFlow> {
    let document_id =
        document_id.ok_or_else(|| ClientError::Validation(NO_DOCUMENT_MESSAGE.to_string()))?;

    let resp = backend
        .generate_quiz(&GenerateQuizRequest {
            user_id,
            document_id,
            num_questions,
        })
        .await?;
    let flow = quiz_from_response(resp)?;
    if let QuizFlow::Answering { quiz, .. } = &flow {
        tracing::info!(
            "Generated quiz {} with {} questions",
            quiz.quiz_id,
            quiz.questions.len()
        );
    }
    Ok(flow)
}

/// Submit whatever answers were given; unanswered questions are left out.
pub async fn submit(
    backend: &dyn Backend,
    user_id: UserId,
    quiz: &Quiz,
    answers: &Answers,
) -> Result<QuizResult> {
    let result = backend
        .validate_quiz(&ValidateQuizRequest {
            quiz_id: quiz.quiz_id,
            user_id,
            answers: answers.clone(),
        })
        .await?;
    tracing::info!(
        "Quiz {} graded: {}/{}",
        quiz.quiz_id,
        result.score,
        result.total
    );
    Ok(result)
}

/// Past quizzes with their latest score
pub async fn history(backend: &dyn Backend, user_id: UserId) -> Result<Vec<QuizAttemptSummary>> {
    let resp = backend.quiz_history(user_id).await?;
    if !resp.status {
        return Err(ClientError::Rejected("Could not load quiz history".to_string()));
    }
    Ok(resp.history)
}

/// Option text for a letter reported in a result detail, looked up in the
/// question at the same position.
pub fn detail_option_text<'a>(quiz: &'a Quiz, index: usize, letter: Option<&str>) -> Option<&'a str> {
    let letter = OptionLetter::parse(letter?)?;
    quiz.questions.get(index)?.option_text(letter)
}
