//! Quiz view: generate, answer, grade

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::components::LoadingSpinner;
use crate::error::user_message;
use crate::quiz::{self, QuizFlow, DEFAULT_QUESTION_COUNT, QUESTION_COUNT_HINT};
use crate::state::AppState;
use crate::types::{DocumentId, OptionLetter, Quiz, QuizAttemptSummary, QuizResult};

/// Quiz flow over the user's uploaded documents
#[component]
pub fn QuizPanel() -> impl IntoView {
    let state = expect_context::<AppState>();
    let notifications = state.notifications;

    let flow = RwSignal::new(QuizFlow::default());
    let document_id = RwSignal::new(Option::<DocumentId>::None);
    let count = RwSignal::new(DEFAULT_QUESTION_COUNT.to_string());
    let busy = RwSignal::new(false);
    let history = RwSignal::new(Vec::<QuizAttemptSummary>::new());

    let load_history = move || {
        let Some(user_id) = state.session.user_id_untracked() else {
            return;
        };
        spawn_local(async move {
            let backend = state.backend();
            match quiz::history(backend.as_ref(), user_id).await {
                Ok(attempts) => history.set(attempts),
                Err(e) => tracing::warn!("Could not load quiz history: {}", e),
            }
        });
    };
    load_history();

    let generate = move |_: web_sys::MouseEvent| {
        let num_questions = match quiz::parse_question_count(&count.get_untracked()) {
            Ok(n) => n,
            Err(e) => {
                notifications.error(e.to_string());
                return;
            }
        };
        let Some(user_id) = state.session.user_id_untracked() else {
            notifications.error("Please log in again");
            return;
        };
        let document = document_id.get_untracked();
        busy.set(true);

        spawn_local(async move {
            let backend = state.backend();
            match quiz::generate(backend.as_ref(), user_id, document, num_questions).await {
                Ok(next) => flow.set(next),
                Err(e) => {
                    tracing::error!("Quiz generation failed: {}", e);
                    notifications.error(user_message(&e, "Failed to generate quiz"));
                }
            }
            busy.set(false);
        });
    };

    let submit = move |_: web_sys::MouseEvent| {
        let QuizFlow::Answering { quiz, answers } = flow.get_untracked() else {
            return;
        };
        let Some(user_id) = state.session.user_id_untracked() else {
            notifications.error("Please log in again");
            return;
        };
        busy.set(true);

        spawn_local(async move {
            let backend = state.backend();
            match quiz::submit(backend.as_ref(), user_id, &quiz, &answers).await {
                Ok(result) => {
                    flow.update(|f| *f = std::mem::take(f).graded(result));
                    load_history();
                }
                Err(e) => {
                    tracing::error!("Quiz submission failed: {}", e);
                    notifications.error(user_message(&e, "Failed to submit quiz"));
                }
            }
            busy.set(false);
        });
    };

    let generate_more = move |_: web_sys::MouseEvent| flow.set(QuizFlow::reset());

    // Re-render only when the flow changes stage, not on every answer
    let stage = Memo::new(move |_| flow.with(std::mem::discriminant));

    view! {
        <div class="flex-1 overflow-y-auto px-4 py-6">
            <div class="max-w-3xl mx-auto flex flex-col gap-6">
                {move || {
                    stage.track();
                    match flow.get_untracked() {
                        QuizFlow::Selecting => view! {
                            <div class="card p-6 flex flex-col gap-4 animate-fade-in">
                                <h2 class="text-xl font-semibold">"Generate a quiz"</h2>
                                <label class="flex flex-col gap-1 text-sm">
                                    <span class="text-[var(--text-secondary)]">"Document"</span>
                                    <select
                                        on:change=move |ev| document_id.set(event_target_value(&ev).parse().ok())
                                        class="input"
                                    >
                                        <option value="" selected=move || document_id.get().is_none()>
                                            "Select a document"
                                        </option>
                                        {move || state.session.documents().into_iter().map(|doc| {
                                            let id = doc.document_id;
                                            view! {
                                                <option
                                                    value=id.to_string()
                                                    selected=move || document_id.get() == Some(id)
                                                >
                                                    {doc.filename}
                                                </option>
                                            }
                                        }).collect::<Vec<_>>()}
                                    </select>
                                </label>
                                <label class="flex flex-col gap-1 text-sm">
                                    <span class="text-[var(--text-secondary)]">"Number of questions"</span>
                                    <input
                                        type="number"
                                        min=QUESTION_COUNT_HINT.0.to_string()
                                        max=QUESTION_COUNT_HINT.1.to_string()
                                        prop:value=move || count.get()
                                        on:input=move |ev| count.set(event_target_value(&ev))
                                        class="input"
                                    />
                                </label>
                                <button
                                    on:click=generate
                                    disabled=move || busy.get()
                                    class="btn btn-primary py-3"
                                >
                                    <Show when=move || busy.get()>
                                        <LoadingSpinner />
                                    </Show>
                                    {move || if busy.get() { "Generating..." } else { "Generate Quiz" }}
                                </button>
                            </div>
                            <QuizHistory history=history.into() />
                        }.into_any(),

                        QuizFlow::Answering { quiz, .. } => view! {
                            <div class="flex flex-col gap-4 animate-fade-in">
                                {quiz.questions.iter().enumerate().map(|(i, q)| {
                                    let question_no = i as u32 + 1;
                                    view! {
                                        <div class="card p-4">
                                            <p class="font-medium mb-3">{format!("{}. {}", question_no, q.question)}</p>
                                            <div class="flex flex-col gap-2">
                                                {OptionLetter::ALL.iter().copied().filter_map(|letter| {
                                                    let text = q.option_text(letter)?.to_string();
                                                    Some(view! {
                                                        <label class="flex items-center gap-2 cursor-pointer text-sm">
                                                            <input
                                                                type="radio"
                                                                name=format!("q{}", question_no)
                                                                prop:checked=move || flow.with(|f| f.answer(question_no) == Some(letter))
                                                                on:change=move |_| flow.update(|f| f.record_answer(question_no, letter))
                                                            />
                                                            <span>{format!("{}. {}", letter, text)}</span>
                                                        </label>
                                                    })
                                                }).collect::<Vec<_>>()}
                                            </div>
                                        </div>
                                    }
                                }).collect::<Vec<_>>()}
                                <button
                                    on:click=submit
                                    disabled=move || busy.get()
                                    class="btn btn-primary py-3"
                                >
                                    {move || if busy.get() { "Submitting..." } else { "Submit Quiz" }}
                                </button>
                            </div>
                        }.into_any(),

                        QuizFlow::Graded { quiz, result } => view! {
                            <QuizResultView quiz=quiz result=result />
                            <button on:click=generate_more class="btn btn-primary py-3">
                                "Generate More Questions"
                            </button>
                        }.into_any(),

                        QuizFlow::Malformed => view! {
                            <div class="card p-6 text-center text-[var(--accent-error)]">
                                "Error: Quiz data is invalid"
                            </div>
                            <button on:click=generate_more class="btn btn-primary py-3">
                                "Generate More Questions"
                            </button>
                        }.into_any(),
                    }
                }}
            </div>
        </div>
    }
}

/// Score and per-question breakdown, exactly as graded by the backend
#[component]
fn QuizResultView(quiz: Quiz, result: QuizResult) -> impl IntoView {
    view! {
        <div class="card p-6 flex flex-col gap-4 animate-fade-in">
            <h2 class="text-2xl font-bold text-gradient">
                {format!("Score: {} / {}", result.score, result.total)}
            </h2>
            {result.details.iter().enumerate().map(|(i, detail)| {
                let yours = detail.your_answer.clone();
                let your_text = quiz::detail_option_text(&quiz, i, yours.as_deref())
                    .map(str::to_string);
                let correct_text = quiz::detail_option_text(&quiz, i, Some(detail.correct_answer.as_str()))
                    .map(str::to_string);
                let is_correct = yours.as_deref() == Some(detail.correct_answer.as_str());
                view! {
                    <div class=format!(
                        "p-4 rounded-[var(--radius-md)] border {}",
                        if is_correct { "border-[var(--accent-success)]" } else { "border-[var(--accent-error)]" }
                    )>
                        <p class="font-medium mb-2">
                            {format!("{}. {}", detail.question_no.unwrap_or(i as u32 + 1), detail.question)}
                        </p>
                        <p class="text-sm">
                            "Your answer: "
                            {match (yours, your_text) {
                                (Some(letter), Some(text)) => format!("{}. {}", letter, text),
                                (Some(letter), None) => letter,
                                (None, _) => "Not answered".to_string(),
                            }}
                        </p>
                        <p class="text-sm text-[var(--accent-success)]">
                            "Correct answer: "
                            {match correct_text {
                                Some(text) => format!("{}. {}", detail.correct_answer, text),
                                None => detail.correct_answer.clone(),
                            }}
                        </p>
                    </div>
                }
            }).collect::<Vec<_>>()}
        </div>
    }
}

/// Past quizzes with their latest score
#[component]
fn QuizHistory(history: Signal<Vec<QuizAttemptSummary>>) -> impl IntoView {
    view! {
        <Show when=move || !history.get().is_empty()>
            <div class="card p-6">
                <h3 class="text-xs font-semibold text-[var(--text-muted)] uppercase tracking-wider mb-3">
                    "Quiz History"
                </h3>
                <div class="flex flex-col gap-2">
                    {move || history.get().into_iter().map(|attempt| {
                        let score = match (attempt.last_score, attempt.total_questions.or(attempt.num_questions)) {
                            (Some(score), Some(total)) => format!("{} / {}", score, total),
                            _ => "Not attempted".to_string(),
                        };
                        view! {
                            <div class="flex items-center justify-between text-sm">
                                <span>{format!("Quiz #{}", attempt.quiz_id)}</span>
                                <span class="text-[var(--text-secondary)]">{score}</span>
                            </div>
                        }
                    }).collect::<Vec<_>>()}
                </div>
            </div>
        </Show>
    }
}
